use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::notify::notifier::Notifier;
use crate::types::alert_event::AlertEvent;

const MACOS_DEFAULT_SOUND: &str = "/System/Library/Sounds/Glass.aiff";
const LINUX_DEFAULT_SOUND: &str = "/usr/share/sounds/freedesktop/stereo/bell.oga";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
}

impl Platform {
    pub fn host() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::MacOs)
        } else if cfg!(target_os = "linux") {
            Some(Self::Linux)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// Desktop banner followed by an alert sound.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    platform: Platform,
    sound_file: Option<PathBuf>,
}

impl DesktopNotifier {
    pub fn new(platform: Platform, sound_file: Option<PathBuf>) -> Self {
        Self {
            platform,
            sound_file,
        }
    }

    pub fn commands(&self, alert: &AlertEvent) -> Vec<ShellCommand> {
        let mut commands = Vec::with_capacity(2);

        match self.platform {
            Platform::MacOs => {
                let script = format!(
                    "display notification \"{}\" with title \"{}\"",
                    applescript_escape(&alert.message),
                    applescript_escape(&alert.title)
                );
                commands.push(ShellCommand {
                    program: "osascript",
                    args: vec!["-e".to_string(), script],
                });

                commands.push(ShellCommand {
                    program: "afplay",
                    args: vec![self.sound_or(MACOS_DEFAULT_SOUND)],
                });
            }
            Platform::Linux => {
                commands.push(ShellCommand {
                    program: "notify-send",
                    args: vec![
                        "--urgency=critical".to_string(),
                        alert.title.clone(),
                        alert.message.clone(),
                    ],
                });

                commands.push(ShellCommand {
                    program: "paplay",
                    args: vec![self.sound_or(LINUX_DEFAULT_SOUND)],
                });
            }
        }

        commands
    }

    fn sound_or(&self, default: &str) -> String {
        self.sound_file
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| default.to_string())
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, alert: &AlertEvent) {
        debug!(message = %alert.message, "sending desktop notification");

        for command in self.commands(alert) {
            match Command::new(command.program).args(&command.args).status().await {
                Ok(status) if status.success() => {}
                Ok(status) => warn!(program = command.program, %status, "notification command failed"),
                Err(error) => warn!(program = command.program, %error, "notification command could not run"),
            }
        }
    }
}

fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_commands_escape_quotes() {
        let notifier = DesktopNotifier::new(Platform::MacOs, None);
        let alert = AlertEvent::new(r#"bad "watchlist" at C:\stocks"#);

        let commands = notifier.commands(&alert);

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program, "osascript");
        assert_eq!(
            commands[0].args[1],
            r#"display notification "bad \"watchlist\" at C:\\stocks" with title "Stock price alert""#
        );
        assert_eq!(commands[1].program, "afplay");
        assert_eq!(commands[1].args, vec![MACOS_DEFAULT_SOUND.to_string()]);
    }

    #[test]
    fn test_linux_plays_a_sound_by_default() {
        let alert = AlertEvent::price_not_found("INFY");

        let default = DesktopNotifier::new(Platform::Linux, None);
        let commands = default.commands(&alert);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program, "notify-send");
        assert_eq!(commands[0].args[2], alert.message);
        assert_eq!(commands[1].program, "paplay");
        assert_eq!(commands[1].args, vec![LINUX_DEFAULT_SOUND.to_string()]);

        let custom = DesktopNotifier::new(Platform::Linux, Some(PathBuf::from("/tmp/bell.oga")));
        let commands = custom.commands(&alert);
        assert_eq!(commands[1].program, "paplay");
        assert_eq!(commands[1].args, vec!["/tmp/bell.oga".to_string()]);
    }
}
