use timers_manager::prelude::*;

use std::io::{self, BufRead};
use std::time::Duration;

// The full tour: a burst of one-shot timers inserted out of deadline order,
// plus one repeating routine. Press enter to shut down.
fn main() -> AnyResult<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let timers = TimersManager::new()?;

    timers.insert_timer(elapsed_report_routine("one-shot 3s"), Duration::from_secs(3));
    timers.insert_timer(elapsed_report_routine("one-shot 2s"), Duration::from_secs(2));
    timers.insert_timer(elapsed_report_routine("one-shot 1s"), Duration::from_secs(1));
    timers.insert_timer(elapsed_report_routine("one-shot 0s"), Duration::ZERO);
    timers.insert_timer(
        elapsed_report_routine("one-shot 5.5s"),
        Duration::from_millis(5500),
    );
    timers.insert_timer(
        elapsed_report_routine("one-shot 500ms"),
        Duration::from_millis(500),
    );

    let repeating = repeating_routine(
        timers.handle(),
        Duration::from_secs(1),
        elapsed_report_routine("repeating 1s"),
    );
    timers.insert_timer(repeating, Duration::from_secs(4));

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    Ok(())
}
