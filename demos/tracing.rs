use timers_manager::prelude::*;

use std::thread::sleep;
use std::time::Duration;

// Same scheduler, observed through tracing: the worker and drain spans show
// up alongside the bridged log records.
fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let timers = TimersManager::new()?;

    timers.insert_timer(|| println!("first"), Duration::from_millis(200));
    timers.insert_timer(|| println!("second"), Duration::from_millis(700));

    // An earlier deadline arriving late; watch the worker re-wake for it.
    sleep(Duration::from_millis(300));
    timers.insert_timer(|| println!("intruder"), Duration::from_millis(50));

    sleep(Duration::from_secs(1));

    Ok(())
}
