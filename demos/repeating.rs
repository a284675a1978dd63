use timers_manager::prelude::*;

use std::thread::sleep;
use std::time::Duration;

fn main() -> AnyResult<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut timers = TimersManager::new()?;

    let mut beat = 0_u32;
    let metronome = repeating_routine(timers.handle(), Duration::from_millis(500), move || {
        beat += 1;
        println!("beat {}", beat);
    });
    timers.insert_timer(metronome, Duration::from_millis(500));

    sleep(Duration::from_secs(3));
    timers.stop()?;

    Ok(())
}
