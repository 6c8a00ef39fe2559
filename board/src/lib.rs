use std::cell::RefCell;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use textwrap::Options;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use tilelib::{Catalog, LiveFilter, SearchField, Tile};

pub const SEARCH_FIELD_ID: &str = "search";

const ICON_WIDTH: usize = 2;
const NAME_WIDTH: usize = 24;
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// Pads or cuts `text` to exactly `width` terminal columns
fn buffer(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    let mut cut = String::new();
    let mut used = 0;
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        // Leave a column for the ellipsis
        if used + char_width + 1 > width {
            break;
        }
        cut.push(c);
        used += char_width;
    }
    if width > 0 {
        cut.push('…');
        used += 1;
    }
    format!("{}{}", cut, " ".repeat(width - used))
}

/// One tile as display lines, description wrapped to fit `width`
pub fn render_tile(tile: &Tile, width: usize) -> Vec<String> {
    let prefix = format!(
        "{} {} | ",
        buffer(&tile.icon, ICON_WIDTH),
        buffer(&tile.name, NAME_WIDTH)
    );
    let prefix_width = prefix.width();
    let indent = format!("{}| ", " ".repeat(prefix_width - 2));
    let wrap_width = width
        .saturating_sub(prefix_width)
        .max(MIN_DESCRIPTION_WIDTH);
    let wrapped = textwrap::wrap(&tile.description, Options::new(wrap_width));

    let mut lines: Vec<String> = wrapped
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{}{}", prefix, line)
            } else {
                format!("{}{}", indent, line)
            }
        })
        .map(|line| line.trim_end().to_string())
        .collect();
    if lines.is_empty() {
        lines.push(prefix.trim_end().to_string());
    }
    lines
}

/// Visible tiles, then a count of how many are shown
pub fn render_board(filter: &LiveFilter<Tile>, width: usize) -> Vec<String> {
    let mut display: Vec<String> = filter
        .visible()
        .flat_map(|tile| render_tile(tile, width))
        .collect();
    if filter.visible_count() == 0 {
        display.push("No tiles match".to_string());
    }
    display.push(String::new());
    display.push(format!(
        "{} of {} tiles",
        filter.visible_count(),
        filter.items().len()
    ));
    display
}

/// Lines printed for a one-shot query
pub fn matches_report(catalog: Catalog, query: &str, width: usize) -> Vec<String> {
    let mut filter = catalog.into_filter();
    filter.on_input_change(query);
    render_board(&filter, width)
}

pub fn render_prompt(field: &SearchField) -> String {
    format!("> {}", field.value())
}

pub enum KeyResult {
    Continue,
    Open(Tile),
    Quit,
}

/// Applies one key press to the search field.
///
/// Edits go through the field so its handlers see every change. `filter` must
/// not be borrowed by the caller since the field's handlers borrow it mutably.
pub fn handle_key(
    field: &mut SearchField,
    filter: &RefCell<LiveFilter<Tile>>,
    key: KeyEvent,
) -> KeyResult {
    // Some terminals also report releases and repeats
    if key.kind != KeyEventKind::Press {
        return KeyResult::Continue;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => KeyResult::Quit,
            _ => KeyResult::Continue,
        };
    }
    match key.code {
        KeyCode::Char(c) => field.push(c),
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Esc => {
            if field.value().is_empty() {
                return KeyResult::Quit;
            }
            field.clear();
        }
        KeyCode::Enter => {
            if let Some(tile) = filter.borrow().visible().next().cloned() {
                debug!("Opening tile {}", tile.id);
                return KeyResult::Open(tile);
            }
        }
        _ => {}
    };
    KeyResult::Continue
}

#[cfg(test)]
mod test {
    use std::{io::Write, rc::Rc};

    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use tilelib::{Catalog, LiveFilter, SearchField, Tile};

    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Tile::new("apple", "Apple Pie", "sweet dessert").with_path("/apple"),
            Tile::new("banana", "Banana Bread", "sweet snack").with_icon("🍌"),
        ])
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_buffer() {
        assert_eq!(buffer("pie", 5), "pie  ");
        assert_eq!(buffer("banana", 4), "ban…");
        assert_eq!(buffer("", 0), "");
        assert_eq!(buffer("宽", 4), "宽  ");
        assert_eq!(buffer("宽字宽字", 6), "宽字… ");
        assert_eq!(buffer("宽字宽字", 6).width(), 6);
    }

    #[test]
    fn test_wide_names_keep_columns() {
        let narrow = render_tile(&Tile::new("n", "ab", "x"), 80);
        let wide = render_tile(&Tile::new("w", "宽字", "x").with_icon("📮"), 80);
        assert_eq!(narrow[0].width(), wide[0].width());
        assert_eq!(narrow[0].find('|'), Some(narrow[0].len() - 3));
    }

    #[test]
    fn test_render_tile_wraps() {
        let tile = Tile::new("long", "Long", &"word ".repeat(20));
        let lines = render_tile(&tile, 60);
        assert!(lines.len() > 1);
        assert!(lines[0].contains("Long"));
        assert!(lines[1..].iter().all(|l| !l.contains("Long")));
    }

    #[test]
    fn test_render_tile_without_description() {
        let lines = render_tile(&Tile::new("x", "Empty", ""), 80);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with('|'));
    }

    #[test]
    fn test_render_only_visible() {
        let mut filter = catalog().into_filter();
        filter.on_input_change("bread");
        let board = render_board(&filter, 80);
        assert!(board.iter().any(|l| l.contains("Banana Bread")));
        assert!(!board.iter().any(|l| l.contains("Apple Pie")));
        assert_eq!(board.last().map(String::as_str), Some("1 of 2 tiles"));
    }

    #[test]
    fn test_render_no_match() {
        let mut filter = catalog().into_filter();
        filter.on_input_change("zzz");
        let board = render_board(&filter, 80);
        assert_eq!(board, vec!["No tiles match", "", "0 of 2 tiles"]);
    }

    #[test]
    fn test_matches_report() {
        let report = matches_report(catalog(), "  PIE\t", 80);
        assert!(report[0].contains("Apple Pie"));
        assert!(!report.iter().any(|l| l.contains("Banana Bread")));
        assert_eq!(report.last().map(String::as_str), Some("1 of 2 tiles"));
    }

    #[test]
    fn test_matches_report_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(
            "Id\tName\tDescription\tIcon\tPath
file-compare\tFile compare\tDiff of two uploaded files\t\t/services/file-compare
request-sender\tHTTP request\tSends JSON and shows the response\t📮\t/services/request-sender
"
            .as_bytes(),
        )?;
        let catalog = Catalog::load(file.path())?;

        let report = matches_report(catalog.clone(), " UPLOADED ", 80);
        assert_eq!(report.len(), 3);
        assert!(report[0].contains("File compare"));
        assert_eq!(report[2], "1 of 2 tiles");

        let report = matches_report(catalog, "", 80);
        assert_eq!(report.last().map(String::as_str), Some("2 of 2 tiles"));
        Ok(())
    }

    #[test]
    fn test_release_events_ignored() {
        let filter = Rc::new(RefCell::new(catalog().into_filter()));
        let mut field = SearchField::new(SEARCH_FIELD_ID);
        LiveFilter::subscribe(&filter, &mut field);

        let press = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('p'), KeyModifiers::NONE, KeyEventKind::Release);
        handle_key(&mut field, &filter, press);
        handle_key(&mut field, &filter, release);
        assert_eq!(field.value(), "p");

        field.clear();
        let res = handle_key(
            &mut field,
            &filter,
            KeyEvent::new_with_kind(KeyCode::Esc, KeyModifiers::NONE, KeyEventKind::Release),
        );
        assert!(matches!(res, KeyResult::Continue));
    }

    #[test]
    fn test_typing_filters() {
        let filter = Rc::new(RefCell::new(catalog().into_filter()));
        let mut field = SearchField::new(SEARCH_FIELD_ID);
        LiveFilter::subscribe(&filter, &mut field);

        for c in "PIE".chars() {
            let res = handle_key(&mut field, &filter, press(KeyCode::Char(c)));
            assert!(matches!(res, KeyResult::Continue));
        }
        assert_eq!(render_prompt(&field), "> PIE");
        assert_eq!(filter.borrow().visible_count(), 1);

        handle_key(&mut field, &filter, press(KeyCode::Backspace));
        handle_key(&mut field, &filter, press(KeyCode::Backspace));
        handle_key(&mut field, &filter, press(KeyCode::Backspace));
        assert_eq!(filter.borrow().visible_count(), 2);
    }

    #[test]
    fn test_enter_opens_first_visible() {
        let filter = Rc::new(RefCell::new(catalog().into_filter()));
        let mut field = SearchField::new(SEARCH_FIELD_ID);
        LiveFilter::subscribe(&filter, &mut field);

        field.set_value("snack");
        match handle_key(&mut field, &filter, press(KeyCode::Enter)) {
            KeyResult::Open(tile) => assert_eq!(tile.id, "banana"),
            _ => panic!("expected a tile"),
        }

        field.set_value("zzz");
        let res = handle_key(&mut field, &filter, press(KeyCode::Enter));
        assert!(matches!(res, KeyResult::Continue));
    }

    #[test]
    fn test_escape_clears_then_quits() {
        let filter = Rc::new(RefCell::new(catalog().into_filter()));
        let mut field = SearchField::new(SEARCH_FIELD_ID);
        LiveFilter::subscribe(&filter, &mut field);

        field.set_value("zzz");
        let res = handle_key(&mut field, &filter, press(KeyCode::Esc));
        assert!(matches!(res, KeyResult::Continue));
        assert_eq!(field.value(), "");
        assert_eq!(filter.borrow().visible_count(), 2);

        let res = handle_key(&mut field, &filter, press(KeyCode::Esc));
        assert!(matches!(res, KeyResult::Quit));
    }

    #[test]
    fn test_ctrl_c_quits() {
        let filter = RefCell::new(catalog().into_filter());
        let mut field = SearchField::new(SEARCH_FIELD_ID);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(handle_key(&mut field, &filter, key), KeyResult::Quit));
        assert_eq!(field.value(), "");
    }
}
