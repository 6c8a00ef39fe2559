use std::{cell::RefCell, error, fs::File, io::stdout, rc::Rc};

use clap::{ArgAction, Parser};
use crossterm::{
    cursor::MoveTo,
    event::{Event, EventStream},
    execute,
    style::Stylize,
    terminal::{disable_raw_mode, enable_raw_mode, size, Clear, ClearType},
};
use futures::{future::FutureExt, select, StreamExt};
use log::{debug, info, LevelFilter};
use simplelog::{Config, WriteLogger};

use board::{handle_key, matches_report, render_board, render_prompt, KeyResult, SEARCH_FIELD_ID};
use tilelib::{Catalog, LiveFilter, SearchField, Tile};

const DEFAULT_TILES_FILE: &str = "data/tiles.tsv";
const LOG_FILE: &str = "debug.log";
const FALLBACK_WIDTH: usize = 100;

type Result<T> = std::result::Result<T, Box<dyn error::Error>>;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, default_value = DEFAULT_TILES_FILE)]
    tiles_file: String,

    /// Print the tiles matching this text and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Print the tile listing as JSON and exit
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn terminal_width() -> usize {
    size().map(|(w, _)| w as usize).unwrap_or(FALLBACK_WIDTH)
}

fn redraw(field: &SearchField, filter: &LiveFilter<Tile>) -> std::io::Result<()> {
    execute!(stdout(), MoveTo(0, 0), Clear(ClearType::All))?;
    // Raw mode needs explicit carriage returns
    print!("{}\r\n\r\n", render_prompt(field));
    for line in render_board(filter, terminal_width()) {
        print!("{}\r\n", line);
    }
    let prompt_len = render_prompt(field).chars().count() as u16;
    execute!(stdout(), MoveTo(prompt_len, 0))
}

/// Runs the board until the user quits or opens a tile
async fn run_board(catalog: Catalog) -> Result<Option<Tile>> {
    let filter = Rc::new(RefCell::new(catalog.into_filter()));
    let mut field = SearchField::new(SEARCH_FIELD_ID);
    LiveFilter::subscribe(&filter, &mut field);

    let mut reader = EventStream::new();
    redraw(&field, &filter.borrow())?;

    loop {
        let mut event = reader.next().fuse();

        select! {
            maybe_event = event => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        match handle_key(&mut field, &filter, key) {
                            KeyResult::Continue => {},
                            KeyResult::Open(tile) => return Ok(Some(tile)),
                            KeyResult::Quit => return Ok(None),
                        }
                        redraw(&field, &filter.borrow())?;
                    }
                    Some(Ok(Event::Resize(_, _))) => redraw(&field, &filter.borrow())?,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(None),
                }
            }
        };
    }
}

fn print_matches(catalog: Catalog, query: &str) {
    for line in matches_report(catalog, query, terminal_width()) {
        println!("{}", line);
    }
}

#[tokio::main]
pub async fn main() -> Result<()> {
    let args = Cli::parse();

    if args.debug {
        WriteLogger::init(LevelFilter::Debug, Config::default(), File::create(LOG_FILE)?)?;
    }

    let catalog = Catalog::load(&args.tiles_file)?;
    info!("Loaded {} tiles from {}", catalog.tiles.len(), args.tiles_file);

    if args.json {
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    if let Some(query) = args.query {
        print_matches(catalog, &query);
        return Ok(());
    }

    enable_raw_mode()?;
    let res = run_board(catalog).await;
    execute!(stdout(), MoveTo(0, 0), Clear(ClearType::All))?;
    disable_raw_mode()?;

    match res? {
        Some(tile) => {
            debug!("Opened {:?}", tile);
            let path = tile.path.as_deref().unwrap_or("(no page)");
            println!("{} {} {}", tile.icon, tile.name.bold(), path.grey());
        }
        None => debug!("Quit without opening a tile"),
    }
    Ok(())
}
