//! Integration tests: parsing annotated movetext into a game tree.

use notation_core::annotations::QualityCode;
use notation_core::error::ParseError;
use notation_core::rules::{Rules, StandardRules};
use notation_core::token::GameResult;
use notation_core::tree::LineRef;
use notation_core::parse;
use shakmaty::{fen::Fen, Chess, EnPassantMode};

fn fen(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

#[test]
fn test_main_line_replays_to_same_positions() {
    let parsed = parse("1. e4 e5 2. Nf3 Nc6 3. Bb5 1-0", &StandardRules).unwrap();
    let main = parsed.tree.main_line();
    assert_eq!(main.len(), 5);
    assert_eq!(parsed.tree.result(), Some(GameResult::WhiteWins));

    // replaying the stored notation from the root reproduces every position
    let rules = StandardRules;
    let mut position = rules.initial_position();
    for node in main {
        assert_eq!(fen(&node.position_before), fen(&position));
        let (after, _) = rules.try_move(&position, &node.notation).unwrap();
        assert_eq!(fen(&node.position_after), fen(&after));
        position = after;
    }
}

#[test]
fn test_annotated_variation_scenario() {
    let parsed = parse(
        "1. e4 e5 (1... c5 2. Nf3) 2. Nf3 $1 { strong } Nc6",
        &StandardRules,
    )
    .unwrap();
    let main = parsed.tree.main_line();
    let notations: Vec<&str> = main.iter().map(|n| n.notation.as_str()).collect();
    assert_eq!(notations, vec!["e4", "e5", "Nf3", "Nc6"]);

    // one variation, branching at the e5 ply
    let e5 = &main[1];
    assert_eq!(e5.variations.len(), 1);
    let variation = parsed.tree.variation(e5.variations[0]).unwrap();
    assert_eq!(variation.owner, LineRef::Main);
    assert_eq!(variation.parent_ply, 2);
    assert_eq!(fen(&variation.start_position), fen(&e5.position_before));
    let variation_moves: Vec<&str> =
        variation.moves.iter().map(|n| n.notation.as_str()).collect();
    assert_eq!(variation_moves, vec!["c5", "Nf3"]);

    // quality code and comment both land on the main-line Nf3
    let annotation = parsed.annotations.get(main[2].id).unwrap();
    assert_eq!(annotation.quality, Some(QualityCode(1)));
    assert_eq!(annotation.quality.unwrap().glyph(), Some("!"));
    assert_eq!(annotation.comment.as_deref(), Some("strong"));
    assert!(parsed.annotations.get(main[3].id).is_none());
}

#[test]
fn test_three_levels_of_nesting() {
    let parsed = parse(
        "1. e4 e5 (1... c5 2. Nf3 (2. c3 d5 (2... Nf6 3. e5)))",
        &StandardRules,
    )
    .unwrap();
    let tree = &parsed.tree;

    let outer_id = tree.main_line()[1].variations[0];
    let outer = tree.variation(outer_id).unwrap();
    assert_eq!(outer.owner, LineRef::Main);
    assert_eq!(outer.parent_ply, 2);

    let middle_id = outer.moves[1].variations[0];
    let middle = tree.variation(middle_id).unwrap();
    assert_eq!(middle.owner, LineRef::Variation(outer_id));
    assert_eq!(middle.parent_ply, 2);
    assert_eq!(
        fen(&middle.start_position),
        fen(&outer.moves[0].position_after)
    );

    let inner_id = middle.moves[1].variations[0];
    let inner = tree.variation(inner_id).unwrap();
    assert_eq!(inner.owner, LineRef::Variation(middle_id));
    assert_eq!(inner.parent_ply, 2);
    assert_eq!(
        fen(&inner.start_position),
        fen(&middle.moves[0].position_after)
    );
    let inner_moves: Vec<&str> = inner.moves.iter().map(|n| n.notation.as_str()).collect();
    assert_eq!(inner_moves, vec!["Nf6", "e5"]);
}

#[test]
fn test_unclosed_variation_is_structural_error() {
    let text = "1. e4 (1... c5";
    let err = parse(text, &StandardRules).unwrap_err();
    assert_eq!(err, ParseError::UnbalancedVariation { offset: text.len() });
}

#[test]
fn test_unterminated_comment_is_structural_error() {
    let text = "1. e4 { never closed";
    let err = parse(text, &StandardRules).unwrap_err();
    assert_eq!(err, ParseError::UnterminatedComment { offset: text.len() });
}

#[test]
fn test_illegal_move_aborts_with_offset() {
    let err = parse("1. e4 e4", &StandardRules).unwrap_err();
    match err {
        ParseError::IllegalMove {
            notation, offset, ..
        } => {
            assert_eq!(notation, "e4");
            assert_eq!(offset, 6);
        }
        other => panic!("expected IllegalMove, got {other:?}"),
    }
}

#[test]
fn test_error_offsets_account_for_headers() {
    let text = "[White \"A\"]\n[Black \"B\"]\n\n1. e4 (1... c5";
    let err = parse(text, &StandardRules).unwrap_err();
    assert_eq!(err, ParseError::UnbalancedVariation { offset: text.len() });
}

#[test]
fn test_headers_feed_metadata() {
    let text = "[White \"Player1\"]\n[Black \"Player2\"]\n[Result \"1/2-1/2\"]\n\n1. e4 e5 1/2-1/2";
    let parsed = parse(text, &StandardRules).unwrap();
    assert_eq!(parsed.metadata.white, "Player1");
    assert_eq!(parsed.metadata.black, "Player2");
    assert_eq!(parsed.metadata.result, "1/2-1/2");
    assert_eq!(parsed.tree.result(), Some(GameResult::Draw));
}

#[test]
fn test_unrecognized_quality_code_kept_unglyphed() {
    let parsed = parse("1. e4 $22", &StandardRules).unwrap();
    let annotation = parsed
        .annotations
        .get(parsed.tree.main_line()[0].id)
        .unwrap();
    assert_eq!(annotation.quality, Some(QualityCode(22)));
    assert_eq!(annotation.quality.unwrap().glyph(), None);
}

#[test]
fn test_transposed_nodes_keep_independent_annotations() {
    // the variation plays the identical move, reaching the identical
    // position through a different node
    let parsed = parse("1. e4 e5 { main } (1... e5 { alt })", &StandardRules).unwrap();
    let main_e5 = &parsed.tree.main_line()[1];
    let variation = parsed.tree.variation(main_e5.variations[0]).unwrap();
    let alt_e5 = &variation.moves[0];

    assert_eq!(fen(&main_e5.position_after), fen(&alt_e5.position_after));
    assert_ne!(main_e5.id, alt_e5.id);
    assert_eq!(
        parsed.annotations.get(main_e5.id).unwrap().comment.as_deref(),
        Some("main")
    );
    assert_eq!(
        parsed.annotations.get(alt_e5.id).unwrap().comment.as_deref(),
        Some("alt")
    );
}

#[test]
fn test_outline_json_shape() {
    let parsed = parse("1. e4 e5 (1... c5) 2. Nf3 $1", &StandardRules).unwrap();
    let outline = parsed.tree.outline_json(&parsed.annotations);
    let moves = outline["moves"].as_array().unwrap();
    assert_eq!(moves.len(), 3);
    assert_eq!(moves[0]["move"], "e4");
    assert_eq!(moves[1]["variations"].as_array().unwrap().len(), 1);
    assert_eq!(moves[2]["glyph"], "!");
}
