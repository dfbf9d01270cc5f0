use color_eyre::eyre::{eyre, Result};
use itertools::Itertools;
use log::warn;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::Config;
use crate::export::export_event;
use crate::model::catalog::Catalog;
use crate::model::event::{Continent, Event, EventType};
use crate::model::filter::FilterState;
use crate::options::{Command, Opt};
use crate::reminder::Reminder;
use crate::site::Site;
use crate::store::prefs::{Theme, ViewState};
use crate::store::saved::SavedEvents;
use crate::store::session::Session;
use crate::store::Storage;

pub fn run(args: Opt) -> Result<()> {
    if args.create_default_config {
        return create_default_config(&args.config);
    }

    let config = Config::new(&args.config, &args)?;
    let storage = Storage::open(&config.state_dir()?)?;

    match args.command {
        None => render(Site::new(config)?, &storage, FilterState::default()),
        Some(Command::Render {
            continent,
            event_type,
            search,
        }) => {
            let filter = parse_filter(continent, event_type, search, false)?;
            render(Site::new(config)?, &storage, filter)
        }
        Some(Command::List {
            continent,
            event_type,
            search,
            saved,
        }) => {
            let filter = parse_filter(continent, event_type, search, saved)?;
            let site = Site::new(config)?;
            let saved = SavedEvents::load(&storage);
            print_agenda(
                &filter.apply(site.catalog().events(), &saved),
                site.config.reference_year,
                &saved,
            );
            Ok(())
        }
        Some(Command::Save { event_id }) => {
            let site = Site::new(config)?;
            let session = Session::load(&storage);
            let mut saved = SavedEvents::load(&storage);
            toggle_saved(site.catalog(), &storage, &session, &mut saved, &event_id)
        }
        Some(Command::Saved) => {
            let site = Site::new(config)?;
            let saved = SavedEvents::load(&storage);
            let listed: Vec<Rc<Event>> = saved
                .ids()
                .iter()
                .filter_map(|id| site.catalog().find(id.as_str()).cloned())
                .collect();
            print_agenda(&listed, site.config.reference_year, &saved);
            Ok(())
        }
        Some(Command::Signin { email, password }) => {
            let mut session = Session::load(&storage);
            session.sign_in(&storage, &email, &password)?;
            // a sign-in reloads the consuming surface in full
            let site = Site::new(config)?;
            render_with_state(&site, &storage, FilterState::default())?;
            Ok(())
        }
        Some(Command::Signout) => {
            let mut session = Session::load(&storage);
            session.sign_out(&storage)?;
            println!("signed out");
            Ok(())
        }
        Some(Command::Export { event_id, output }) => {
            let site = Site::new(config)?;
            let event = find_event(site.catalog(), &event_id)?;
            let path = export_event(event, site.config.reference_year, &output)?;
            println!("wrote {}", path.display());
            Ok(())
        }
        Some(Command::Theme { theme }) => {
            let theme: Theme = theme.parse().map_err(|e: String| eyre!(e))?;
            theme.store(&storage)?;
            println!("theme set to {}", theme);
            Ok(())
        }
        Some(Command::Browse) => browse(Site::new(config)?, &storage),
    }
}

fn create_default_config(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        return Err(eyre!("config file already exists: {:?}", path));
    }
    std::fs::write(path, doku::to_toml::<Config>())?;
    println!("wrote example config to {}", path.display());
    Ok(())
}

fn parse_filter(
    continent: Option<String>,
    event_type: Option<String>,
    search: Option<String>,
    saved_only: bool,
) -> Result<FilterState> {
    Ok(FilterState {
        continent: continent
            .map(|c| c.parse::<Continent>())
            .transpose()
            .map_err(|e| eyre!(e))?,
        event_type: event_type
            .map(|t| t.parse::<EventType>())
            .transpose()
            .map_err(|e| eyre!(e))?,
        search: search.unwrap_or_default(),
        saved_only,
    })
}

/// Render with the persisted view flag folded into the filter.
fn render(site: Site, storage: &Storage, filter: FilterState) -> Result<()> {
    render_with_state(&site, storage, filter)?;
    Ok(())
}

fn render_with_state(site: &Site, storage: &Storage, mut filter: FilterState) -> Result<PathBuf> {
    let session = Session::load(storage);
    let saved = SavedEvents::load(storage);
    let view = ViewState::load(storage);
    let theme = Theme::load(storage);

    filter.saved_only = filter.saved_only || view.show_only_saved;
    if filter.saved_only && !session.signed_in() {
        warn!("showing only saved events, but nobody is signed in");
    }

    let index_path = site.render(&filter, &session, &saved, theme)?;
    println!("rendered {}", index_path.display());
    Ok(index_path)
}

fn toggle_saved(
    catalog: &Catalog,
    storage: &Storage,
    session: &Session,
    saved: &mut SavedEvents,
    event_id: &str,
) -> Result<()> {
    let event = find_event(catalog, event_id)?;
    if !session.signed_in() {
        println!("sign in first to save events (eventcal signin you@example.com)");
        return Ok(());
    }

    if saved.toggle(storage, session, event)? {
        println!("saved {}", event.name());
    } else {
        println!("removed {} from saved events", event.name());
    }
    Ok(())
}

fn find_event<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a Rc<Event>> {
    catalog
        .find(id)
        .ok_or_else(|| eyre!("no event with id {:?}; ids are shown by `list`", id))
}

fn print_agenda(events: &[Rc<Event>], year: i32, saved: &SavedEvents) {
    if events.is_empty() {
        println!("no events match");
        return;
    }

    let by_month = events
        .iter()
        .sorted_by_key(|e| (e.month().number_from_month(), e.start_day()))
        .group_by(|e| e.month());

    for (month, month_events) in &by_month {
        println!("{} {}", month.name(), year);
        for event in month_events {
            println!(
                "  {} {:24} {} [{}] {}{}",
                event.date_range(year),
                event.name(),
                event.location_with_flag(),
                event.event_type(),
                event.id(),
                if saved.is_saved(event) { " ♥" } else { "" },
            );
        }
    }
}

const BROWSE_HELP: &str = "\
commands:
  continent <name>|none   filter by continent (\"Online\" counts as one)
  type <name>|none        filter by event type
  search [text]           free text search over names and locations
  saved [on|off]          show only saved events
  clear                   drop all filters
  list                    print the filtered agenda
  goto <month>            print the page URL for a month
  save <event-id>         toggle an event in the saved list
  export <event-id>       write the .ics file for an event
  signin <email> [pw]     demo sign-in
  signout                 sign out
  theme <light|dark>      switch the rendered theme
  quit                    leave the browser";

/// The interactive browser: a line-oriented shell over the same state the
/// one-shot commands use. Every mutation re-runs filter, grid and render.
fn browse(site: Site, storage: &Storage) -> Result<()> {
    let mut session = Session::load(storage);
    let mut saved = SavedEvents::load(storage);
    let mut view = ViewState::load(storage);
    let mut theme = Theme::load(storage);
    let mut filter = FilterState {
        saved_only: view.show_only_saved,
        ..FilterState::default()
    };

    let mut reminder = if session.signed_in() {
        None
    } else {
        Some(Reminder::sign_in_nudge(site.config.reminder_delay()?))
    };

    let mut index_path = site.render(&filter, &session, &saved, theme)?;
    println!("browsing {} ({})", index_path.display(), filter.describe());
    println!("type `help` for commands");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("eventcal> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let rest = words.collect::<Vec<_>>().join(" ");

        let mut dirty = true;
        match command {
            "help" => {
                println!("{}", BROWSE_HELP);
                dirty = false;
            }
            "quit" | "exit" => break,
            "continent" => match rest.as_str() {
                "" | "none" | "all" => filter.continent = None,
                name => match name.parse() {
                    Ok(continent) => filter.continent = Some(continent),
                    Err(e) => {
                        println!("{}", e);
                        dirty = false;
                    }
                },
            },
            "type" => match rest.as_str() {
                "" | "none" | "all" => filter.event_type = None,
                name => match name.parse() {
                    Ok(event_type) => filter.event_type = Some(event_type),
                    Err(e) => {
                        println!("{}", e);
                        dirty = false;
                    }
                },
            },
            "search" => filter.search = rest,
            "clear" => {
                filter.continent = None;
                filter.event_type = None;
                filter.search.clear();
            }
            "saved" => {
                let show = match rest.as_str() {
                    "on" | "" => true,
                    "off" => false,
                    other => {
                        println!("expected on or off, got {:?}", other);
                        dirty = false;
                        continue;
                    }
                };
                view.set_show_only_saved(storage, show)?;
                filter.saved_only = show;
            }
            "save" => {
                toggle_saved(site.catalog(), storage, &session, &mut saved, &rest)
                    .unwrap_or_else(|e| println!("{}", e));
            }
            "signin" => {
                let mut args = rest.split_whitespace();
                let Some(email) = args.next() else {
                    println!("usage: signin <email> [password]");
                    dirty = false;
                    continue;
                };
                session.sign_in(storage, email, args.next().unwrap_or_default())?;
                // the nudge is moot once the state it prompts for has changed
                if let Some(reminder) = reminder.take() {
                    reminder.cancel();
                }
            }
            "signout" => {
                session.sign_out(storage)?;
                view.show_only_saved = false;
                filter.saved_only = false;
            }
            "theme" => match rest.parse::<Theme>() {
                Ok(chosen) => {
                    theme = chosen;
                    theme.store(storage)?;
                }
                Err(e) => {
                    println!("{}", e);
                    dirty = false;
                }
            },
            "goto" => {
                match rest.parse::<chrono::Month>() {
                    Ok(month) => println!(
                        "{}#{}",
                        index_path.display(),
                        month.name().to_lowercase()
                    ),
                    Err(_) => println!("unknown month: {}", rest),
                }
                dirty = false;
            }
            "list" => {
                print_agenda(
                    &filter.apply(site.catalog().events(), &saved),
                    site.config.reference_year,
                    &saved,
                );
                dirty = false;
            }
            "export" => {
                match find_event(site.catalog(), &rest)
                    .and_then(|e| export_event(e, site.config.reference_year, Path::new(".")))
                {
                    Ok(path) => println!("wrote {}", path.display()),
                    Err(e) => println!("{}", e),
                }
                dirty = false;
            }
            other => {
                println!("unknown command: {} (try `help`)", other);
                dirty = false;
            }
        }

        if dirty {
            index_path = site.render(&filter, &session, &saved, theme)?;
            let visible = filter.apply(site.catalog().events(), &saved);
            println!(
                "{} events shown ({})",
                visible.len(),
                filter.describe()
            );
        }
    }

    // dropping a pending reminder cancels it on the way out
    Ok(())
}
