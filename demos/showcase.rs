//! Showcase demo: The full builder surface on a live terminal.
//!
//! Types a multi-colored script with dynamic content, a rainbow, erases,
//! and an all-in-one combo, looping twice. When the run finishes, press
//! Enter or 's' to replay; 'q' or Escape quits.

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use teletype::{LoopMode, Options, Rgb, TermCanvas, TriggerActor, Typewriter};

/// Wall-clock reading, recomputed every time the dynamic action runs.
fn clock_line() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format!(
        "{:02}:{:02}:{:02} UTC",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60
    )
}

fn main() -> std::io::Result<()> {
    println!("Teletype Showcase");
    println!("=================");
    println!("Enter/'s' replays, 'q' or Escape quits.");
    println!();

    let options = Options {
        loop_mode: LoopMode::Count(2),
        auto_start: true,
        typing_rate: 20,
        deleting_rate: 7,
    };

    let mut tw = Typewriter::with_options(TermCanvas::new()?, options)?;

    tw.clear()
        .dynamic_type(|| format!("It is now: {}\n", clock_line()), 1000)
        .debug("Done waiting 1000ms")
        .echo(Rgb::ORANGE_RED, "\nThree of me ...")
        .type_text("\n\nHey! You totally love this right?", 500)
        .type_text("\n\n", 0)
        .rainbow("ROYGBIV -- terminals-love-rainbows")
        .colour(Rgb::FIREBRICK, "")
        .rainbow("\n\nWhat a joyful thing this is :)")
        .delay(500)
        .colour(None, "")
        .type_text("\n\nSome lazy dogs are being overrun by fast foxes!", 250)
        .erase()
        .type_text("\n\nSame colour as the last letter of the text above!", 0)
        .colour(Rgb::GREEN_YELLOW, "\nTHE FUN JUST DOES NOT STOP")
        .delay(250)
        .colour(Rgb::YELLOW, "")
        .delay(250)
        .type_text(" ...", 250)
        .colour(Rgb::LIGHT_BLUE, "\n\nHey! How about this?")
        .all_in_one(Rgb::ORANGE, "\n\nType, wait, erase, wait -- all in one!", 500)
        .delay(1500);

    let trigger = TriggerActor::spawn(Duration::from_millis(50));
    tw.ready()?.serve(trigger.receiver())?;
    trigger.join();

    Ok(())
}
