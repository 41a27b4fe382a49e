//! Cancel Meetings entry point
//!
//! Native: headless autoplay demo that logs the session. Web builds use the
//! library's `web` module instead.

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cancel_meetings::notify::CLEARED_MESSAGE;
    use cancel_meetings::sim::GameEvent;
    use cancel_meetings::{Session, Settings};

    env_logger::init();

    /// 60 Hz host frames
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "Ada".to_string());
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({}), picking a random one", e);
            rand::random()
        }
        None => rand::random(),
    };

    log::info!("Cancel Meetings (native) starting with seed {}", seed);

    let mut session = Session::with_settings(seed, Settings::load());
    session.set_autopilot(true);
    session.start_session(&name, 0.0);
    let total = session.remaining();

    let mut now = 0.0;
    let mut frames = 0u64;
    let mut canceled = 0usize;
    while frames < MAX_FRAMES && session.frame_loop().is_running() && !session.is_cleared() {
        now += FRAME_MS;
        frames += 1;
        session.frame(now);

        for event in session.drain_events() {
            match event {
                GameEvent::MeetingCanceled { title, .. } => {
                    canceled += 1;
                    println!("[{:>7.1}s] Meeting canceled: {}", now / 1000.0, title);
                }
                GameEvent::Cleared => println!("{}", CLEARED_MESSAGE),
                GameEvent::GameOver => {
                    if let Some(message) = session.game_over_message() {
                        println!("{}", message);
                    }
                }
                GameEvent::Served => log::debug!("Serve released"),
            }
        }
    }

    println!(
        "{}: canceled {}/{} meetings in {:.1}s ({} frames)",
        name,
        canceled,
        total,
        now / 1000.0,
        frames
    );
}
