use crate::state::tournament::PairingRule;
use log::LevelFilter;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Default pairing rule for new runs. Overridable per run from the
    /// setup screen.
    pub pairing: PairingRule,
}

impl AppSettings {
    pub fn load() -> Self {
        // POKECUP_PAIRING=positional restores classic bracket locality;
        // anything else keeps the reseed-by-id rule stored results use.
        // Log level can be overridden via env var RUST_LOG in the future.
        let pairing = match std::env::var("POKECUP_PAIRING").as_deref() {
            Ok("positional") => PairingRule::Positional,
            _ => PairingRule::ReseedById,
        };
        Self { full_screen: false, log_level: None, pairing }
    }
}
