use log::warn;

/// Hands a folder, file or URL to the desktop's default handler.
pub fn open_with_system(target: String) {
    std::thread::spawn(move || {
        let result = opener_command().arg(&target).spawn();
        if let Err(err) = result {
            warn!("could not open {target}: {err}");
        }
    });
}

#[cfg(target_os = "windows")]
fn opener_command() -> std::process::Command {
    std::process::Command::new("explorer")
}

#[cfg(target_os = "macos")]
fn opener_command() -> std::process::Command {
    std::process::Command::new("open")
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener_command() -> std::process::Command {
    std::process::Command::new("xdg-open")
}
