//! Walks an annotated game file: parse, print the JSON outline, then replay
//! the main line position by position (taking the main move at any branch).

use notation_core::rules::StandardRules;
use replayer::{Navigator, Step};
use shakmaty::{fen::Fen, EnPassantMode};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: walk-game <game.pgn>"))?;
    let text = std::fs::read_to_string(&path)?;

    let parsed = notation_core::parse(&text, &StandardRules)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&parsed.tree.outline_json(&parsed.annotations))?
    );

    let (metadata, tree, annotations) = parsed.into_shared();
    info!(
        white = %metadata.white,
        black = %metadata.black,
        result = %metadata.result,
        "game loaded"
    );

    let mut navigator = Navigator::create(tree, annotations);
    navigator.on_position_changed(|event| {
        if let Some(annotation) = &event.annotation {
            if let Some(comment) = &annotation.comment {
                info!(comment = %comment, "annotated position");
            }
        }
    });

    loop {
        match navigator.step_forward() {
            Ok(Step::Moved) => {
                let fen = Fen::from_position(navigator.position(), EnPassantMode::Legal);
                println!("{fen}");
            }
            Ok(Step::ChoiceRequired(choice)) => {
                info!(
                    continuation = %choice.continuation,
                    alternatives = choice.alternatives.len(),
                    "taking the main move at a branch"
                );
                navigator.choose_main()?;
                let fen = Fen::from_position(navigator.position(), EnPassantMode::Legal);
                println!("{fen}");
            }
            Ok(Step::EndOfLine) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
