use crate::commands::{CmdMessage, CmdResult};
use crate::config::VaultConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = VaultConfig::load(dir)?;
    match action {
        ConfigAction::ShowAll => Ok(CmdResult::default().with_config(config)),
        ConfigAction::ShowKey(key) => {
            let message = match config.get(&key) {
                Some(value) => CmdMessage::info(value),
                None => CmdMessage::error(format!("Unknown config key: {}", key)),
            };
            Ok(CmdResult::default().with_message(message))
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                return Ok(CmdResult::default().with_message(CmdMessage::error(e.to_string())));
            }
            config.save(dir)?;
            let shown = config.get(&key).unwrap_or(value);
            Ok(CmdResult::default()
                .changed()
                .with_message(CmdMessage::success(format!("{} set to {}", key, shown)))
                .with_config(config))
        }
    }
}
