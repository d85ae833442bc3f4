use layers::config::DEFAULT_LEVEL;
use layers::host::MapHost;
use tracing::debug;

pub const PANE_COUNT: i64 = 10;
const BASE_Z_INDEX: i32 = 505;
const Z_INDEX_STEP: i32 = 10;

pub fn pane_name(level: i64) -> String {
    format!("level_{level}")
}

pub fn pane_z_index(level: i64) -> i32 {
    BASE_Z_INDEX + Z_INDEX_STEP * level as i32
}

/// Stacking panes `level_0` (bottom) to `level_9` (top).
#[derive(Debug, Default, Clone)]
pub struct PaneRegistry {
    names: Vec<String>,
}

impl PaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates every pane on the host, lowest first. Runs once.
    pub fn register_all(&mut self, host: &mut dyn MapHost) {
        if !self.names.is_empty() {
            return;
        }
        for level in 0..PANE_COUNT {
            let name = pane_name(level);
            host.create_pane(&name, pane_z_index(level));
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Pane for a configured level; unknown levels land on the default pane.
    pub fn resolve(&self, level: Option<i64>) -> String {
        if let Some(level) = level {
            let name = pane_name(level);
            if self.contains(&name) {
                return name;
            }
        }
        debug!("no pane for level {level:?}, using the default");
        pane_name(DEFAULT_LEVEL)
    }
}
