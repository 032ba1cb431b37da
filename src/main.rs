use anyhow::Result;
use term_drawer::cli;
use term_drawer::toggle::ToggleController;
use term_drawer_config::StateStore;
use term_drawer_tmux::TmuxClient;

fn main() {
    let options = cli::process_cli();
    // CLI --log-level takes precedence over DEBUG_LEVEL.
    term_drawer::debug::init_log_bridge(options.log_level);

    if let Err(e) = run(options) {
        log::error!("Toggle failed: {e:#}");
        log::logger().flush();
        eprintln!("term-drawer: error: {e:#}");
        std::process::exit(1);
    }
    log::logger().flush();
}

fn run(options: cli::RuntimeOptions) -> Result<()> {
    let store = StateStore::for_user(options.socket.clone());
    let tmux = TmuxClient::new(options.socket);
    log::debug!(
        "State directory {}, tmux socket {:?}",
        store.base_dir().display(),
        tmux.runner().socket()
    );

    let outcome = ToggleController::new(&tmux, &store).toggle()?;
    log::debug!("Drawer pane is now {}", outcome.pane());
    Ok(())
}
