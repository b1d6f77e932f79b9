/// Terminal entry point for quadmark.
///
/// Usage: `quadmark [DIR]`. Commands are read line by line from stdin; run
/// `help` for the list.
fn main() -> std::process::ExitCode {
    use std::io::{BufRead, Write};
    use std::process::ExitCode;

    use quadmark::app::{Flow, QuadmarkApp};
    use quadmark::logging::init_logging;
    use quadmark::message::Message;
    use quadmark::{AnnotationSession, AppConfig, LabelError};

    let loaded = AppConfig::load_from_default_path();
    let first_run = loaded.is_none();
    let config = loaded.unwrap_or_default();
    init_logging(config.preferences.log_level);
    // first run writes the defaults out for editing; a broken file is left alone
    let fresh_path = AppConfig::default_path().filter(|path| first_run && !path.exists());
    if let Some(path) = fresh_path {
        config.save_to(&path).unwrap_or_else(|e| {
            log::warn!("Could not write default config to {:?}: {}", path, e);
        });
    }

    let mut app = QuadmarkApp::new(AnnotationSession::from_config(&config));
    let mut out = String::new();

    let mut pending: Vec<Message> = std::env::args_os()
        .nth(1)
        .map(|dir| Message::OpenFolder(dir.into()))
        .into_iter()
        .collect();
    if pending.is_empty() {
        app.write_status(&mut out);
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let message = match pending.pop() {
            Some(message) => message,
            None => {
                print!("{out}> ");
                out.clear();
                let _ = std::io::stdout().flush();
                match lines.next() {
                    Some(Ok(line)) => match Message::parse(&line) {
                        Ok(message) => message,
                        Err(e) => {
                            out = format!("{e}\n");
                            continue;
                        }
                    },
                    Some(Err(e)) => {
                        log::error!("Failed to read input: {}", e);
                        return ExitCode::FAILURE;
                    }
                    None => break,
                }
            }
        };

        match app.update(message, &mut out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) if e.is_store_failure() => {
                print!("{out}");
                log::error!("Label store failure, stopping: {}", e);
                return ExitCode::FAILURE;
            }
            Err(e @ (LabelError::EmptyDirectory { .. } | LabelError::Scan { .. })) => {
                out.push_str(&format!("{e}\n"));
                app.write_status(&mut out);
            }
            Err(e) => out.push_str(&format!("{e}\n")),
        }
    }

    print!("{out}");
    ExitCode::SUCCESS
}
