//! Instruction Dispatcher
//!
//! Walks a stream of [`Instruction`]s once, front to back, and drives a
//! [`LegacyTerm`]. Nothing is buffered beyond the instruction being applied.

mod instruction;

pub use instruction::{ControlCode, EraseMode, Instruction};

use tracing::{trace, warn};

use crate::console::ConsoleApi;
use crate::core::Coordinate;
use crate::term::LegacyTerm;

/// Render `instructions` onto the console behind `term`
pub fn render<'a, C, I>(instructions: I, term: &mut LegacyTerm<C>)
where
    C: ConsoleApi,
    I: IntoIterator<Item = &'a Instruction>,
{
    for instruction in instructions {
        match instruction {
            Instruction::Text {
                text,
                style: Some(style),
            } => term.write_styled(text, style),
            Instruction::Text { text, style: None } => term.write_text(text),
            Instruction::Control(codes) => {
                for code in codes {
                    apply_control(code, term);
                }
            }
        }
    }
}

/// Apply one control directive
fn apply_control<C: ConsoleApi>(code: &ControlCode, term: &mut LegacyTerm<C>) {
    match code {
        ControlCode::MoveTo { x, y } => term.move_cursor_to(Coordinate::from_one_based(*x, *y)),
        ControlCode::MoveToColumn { x } => term.move_cursor_to_column(x.saturating_sub(1)),
        ControlCode::CarriageReturn => term.write_text("\r"),
        ControlCode::Home => term.move_cursor_to(Coordinate::ORIGIN),
        ControlCode::CursorUp => term.move_cursor_up(),
        ControlCode::CursorDown => term.move_cursor_down(),
        ControlCode::CursorForward => term.move_cursor_forward(),
        ControlCode::CursorBackward => term.move_cursor_backward(),
        ControlCode::HideCursor => term.hide_cursor(),
        ControlCode::ShowCursor => term.show_cursor(),
        ControlCode::EraseInLine(EraseMode::ToEnd) => term.erase_end_of_line(),
        ControlCode::EraseInLine(EraseMode::ToStart) => term.erase_start_of_line(),
        ControlCode::EraseInLine(EraseMode::WholeLine) => term.erase_line(),
        ControlCode::SetWindowTitle(title) => {
            if let Err(e) = term.set_title(title) {
                warn!("Skipping window title: {}", e);
            }
        }
        ControlCode::Bell
        | ControlCode::Clear
        | ControlCode::EnableAltScreen
        | ControlCode::DisableAltScreen => {
            trace!(?code, "Control code has no legacy console equivalent");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{HeadlessConsole, NativeCall};
    use crate::core::{AttributeWord, Color, Style};

    fn term() -> LegacyTerm<HeadlessConsole> {
        let mut term = LegacyTerm::new(HeadlessConsole::new(80, 40)).unwrap();
        term.console_mut().take_calls();
        term
    }

    fn calls_for(instructions: &[Instruction]) -> Vec<NativeCall> {
        let mut term = term();
        render(instructions, &mut term);
        term.console_mut().take_calls()
    }

    #[test]
    fn test_text_only() {
        let calls = calls_for(&[Instruction::text("Hello, world!")]);
        assert_eq!(calls, vec![NativeCall::WriteText("Hello, world!".into())]);
    }

    #[test]
    fn test_text_multiple_segments() {
        let calls = calls_for(&[Instruction::text("Hello, "), Instruction::text("world!")]);
        assert_eq!(
            calls,
            vec![
                NativeCall::WriteText("Hello, ".into()),
                NativeCall::WriteText("world!".into()),
            ]
        );
    }

    #[test]
    fn test_text_with_style() {
        let style = Style::new().fg(Color::BLACK).bg(Color::RED);
        let calls = calls_for(&[Instruction::styled("Hello, world!", style)]);
        assert_eq!(
            calls,
            vec![
                NativeCall::SetTextAttribute(AttributeWord(0x40)),
                NativeCall::WriteText("Hello, world!".into()),
                NativeCall::SetTextAttribute(AttributeWord(0x07)),
            ]
        );
    }

    #[test]
    fn test_empty_style_still_brackets_write() {
        let calls = calls_for(&[Instruction::styled("x", Style::new())]);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], NativeCall::SetTextAttribute(AttributeWord(0x07)));
        assert_eq!(calls[2], NativeCall::SetTextAttribute(AttributeWord(0x07)));
    }

    #[test]
    fn test_control_cursor_move_to() {
        let calls = calls_for(&[Instruction::control([ControlCode::MoveTo { x: 20, y: 30 }])]);
        assert_eq!(
            calls,
            vec![NativeCall::SetCursorPosition(Coordinate::new(29, 19))]
        );
    }

    #[test]
    fn test_control_move_to_zero_is_ignored() {
        let calls = calls_for(&[Instruction::control([ControlCode::MoveTo { x: 0, y: 5 }])]);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_control_extreme_coordinates_are_ignored() {
        let json = r#"[
            {"Control": [{"MoveTo": {"x": -2147483648, "y": 5}}]},
            {"Control": [{"MoveToColumn": {"x": -2147483648}}]}
        ]"#;
        let stream: Vec<Instruction> = serde_json::from_str(json).unwrap();
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(3, 3));
        render(&stream, &mut term);
        assert!(term
            .console()
            .calls()
            .iter()
            .all(|call| !matches!(call, NativeCall::SetCursorPosition(_))));
        assert_eq!(term.console().cursor(), Coordinate::new(3, 3));
        assert_eq!(term.failed_calls(), 0);
    }

    #[test]
    fn test_control_carriage_return() {
        let calls = calls_for(&[Instruction::control([ControlCode::CarriageReturn])]);
        assert_eq!(calls, vec![NativeCall::WriteText("\r".into())]);
    }

    #[test]
    fn test_control_home() {
        let calls = calls_for(&[Instruction::control([ControlCode::Home])]);
        assert_eq!(calls, vec![NativeCall::SetCursorPosition(Coordinate::ORIGIN)]);
    }

    #[test]
    fn test_control_cursor_up() {
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(5, 5));
        render(&[Instruction::control([ControlCode::CursorUp])], &mut term);
        assert_eq!(
            term.console().calls(),
            &[
                NativeCall::GetScreenBufferInfo,
                NativeCall::SetCursorPosition(Coordinate::new(4, 5)),
            ]
        );
    }

    #[test]
    fn test_control_relative_moves() {
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(5, 5));
        render(
            &[Instruction::control([
                ControlCode::CursorDown,
                ControlCode::CursorForward,
                ControlCode::CursorForward,
                ControlCode::CursorBackward,
            ])],
            &mut term,
        );
        assert_eq!(term.console().cursor(), Coordinate::new(6, 6));
    }

    #[test]
    fn test_control_move_to_column() {
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(3, 40));
        render(&[Instruction::control([ControlCode::MoveToColumn { x: 1 }])], &mut term);
        assert_eq!(term.console().cursor(), Coordinate::new(3, 0));
    }

    #[test]
    fn test_control_cursor_visibility() {
        let calls = calls_for(&[Instruction::control([
            ControlCode::HideCursor,
            ControlCode::ShowCursor,
        ])]);
        assert_eq!(
            calls,
            vec![
                NativeCall::SetCursorInfo {
                    size: 100,
                    visible: false
                },
                NativeCall::SetCursorInfo {
                    size: 100,
                    visible: true
                },
            ]
        );
    }

    fn erase_fill(calls: &[NativeCall]) -> Option<(u32, Coordinate)> {
        calls.iter().find_map(|call| match call {
            NativeCall::FillOutputCharacter { len, start, .. } => Some((*len, *start)),
            _ => None,
        })
    }

    #[test]
    fn test_control_erase_to_end_of_line() {
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(2, 30));
        render(
            &[Instruction::control([ControlCode::EraseInLine(EraseMode::ToEnd)])],
            &mut term,
        );
        assert_eq!(
            erase_fill(term.console().calls()),
            Some((50, Coordinate::new(2, 30)))
        );
    }

    #[test]
    fn test_control_erase_to_start_of_line() {
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(2, 30));
        render(
            &[Instruction::control([ControlCode::EraseInLine(EraseMode::ToStart)])],
            &mut term,
        );
        assert_eq!(
            erase_fill(term.console().calls()),
            Some((30, Coordinate::new(2, 0)))
        );
    }

    #[test]
    fn test_control_erase_whole_line() {
        let mut term = term();
        term.console_mut().place_cursor(Coordinate::new(2, 30));
        render(
            &[Instruction::control([ControlCode::EraseInLine(EraseMode::WholeLine)])],
            &mut term,
        );
        assert_eq!(
            erase_fill(term.console().calls()),
            Some((80, Coordinate::new(2, 0)))
        );
    }

    #[test]
    fn test_control_set_window_title() {
        let mut term = term();
        render(
            &[Instruction::control([ControlCode::SetWindowTitle("demo".into())])],
            &mut term,
        );
        assert_eq!(term.console().title(), "demo");
    }

    #[test]
    fn test_oversized_title_does_not_stop_rendering() {
        let calls = calls_for(&[
            Instruction::control([ControlCode::SetWindowTitle("t".repeat(300))]),
            Instruction::text("after"),
        ]);
        assert_eq!(calls, vec![NativeCall::WriteText("after".into())]);
    }

    #[test]
    fn test_unsupported_controls_are_ignored() {
        let calls = calls_for(&[Instruction::control([
            ControlCode::Bell,
            ControlCode::Clear,
            ControlCode::EnableAltScreen,
            ControlCode::DisableAltScreen,
        ])]);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_batch_is_applied_in_order() {
        let calls = calls_for(&[Instruction::control([
            ControlCode::MoveTo { x: 3, y: 2 },
            ControlCode::CarriageReturn,
            ControlCode::Home,
        ])]);
        assert_eq!(
            calls,
            vec![
                NativeCall::SetCursorPosition(Coordinate::new(1, 2)),
                NativeCall::WriteText("\r".into()),
                NativeCall::SetCursorPosition(Coordinate::ORIGIN),
            ]
        );
    }
}
