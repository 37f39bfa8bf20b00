//! Minimal demo: Type a sentence, erase it, three times.

use teletype::{LoopMode, Options, TermCanvas, Typewriter};

fn main() -> std::io::Result<()> {
    let options = Options {
        loop_mode: LoopMode::Count(3),
        auto_start: false,
        typing_rate: 30,
        deleting_rate: 15,
    };

    let mut tw = Typewriter::with_options(TermCanvas::new()?, options)?;
    tw.type_text("The quick brown fox jumps over the lazy dog.", 600)
        .erase()
        .delay(400);

    let report = tw.start()?;

    // Restore the terminal before printing the summary
    drop(tw);
    println!(
        "Ran {} actions over {} passes.",
        report.actions_run, report.passes
    );
    Ok(())
}
