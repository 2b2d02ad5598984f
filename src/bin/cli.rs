use chrono::{NaiveDate, Utc, Weekday};
use roadmap_tool::{
    FlagKind, ItemFilter, ItemKind, ItemStatus, RiceScore, Roadmap, ScheduledItem, TimelineView, ZoomLevel,
    load_roadmap_from_json, save_roadmap_to_json,
};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const TIMELINE_COLUMNS: f64 = 96.0;

struct Session {
    roadmap: Roadmap,
    zoom: ZoomLevel,
    reference: NaiveDate,
    width: f64,
    filter: ItemFilter,
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("ROADMAP_TOOL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;
    Ok(())
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn parse_dependency_list(input: &str) -> Vec<String> {
    if input == "-" {
        return Vec::new();
    }
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               List roadmap items\n  add <id> <title...>                Upsert an item\n  dates <id> <start> <end>           Set start/end dates (YYYY-MM-DD)\n  deps <id> <a,b|->                  Set dependencies (e.g. a,b) or clear with -\n  progress <id> <0-100>              Set progress\n  status <id> <status>               Set status (backlog|doing|done|blocked)\n  kind <id> <feature|story>          Set item kind\n  product <id> <product-id|->        Set or clear owning product\n  delete <id>                        Delete an item and clean up dependencies\n  zoom <year|month|sprint|week>      Set zoom level\n  ref <YYYY-MM-DD>                   Set reference date\n  width <px>                         Set container width\n  week <Mon|Sun>                     Set first day of the week\n  filter show                        Show active item filter\n  filter kind <feature|story|->      Only show one kind of item\n  filter product <product-id|->      Only show one product's items\n  timeline                           Render the timeline\n  validate                           Show dependency warnings\n  order                              Show dependency order\n  rice <reach> <impact> <confidence> <effort>\n                                     Compute a RICE score\n  meta show                          Show roadmap metadata\n  meta name <text...>                Update roadmap name\n  meta desc <text...>                Update roadmap description\n  save <path>                        Save roadmap to JSON\n  load <path>                        Load roadmap from JSON\n  quit|exit                          Exit"
    );
}

fn render_items(roadmap: &Roadmap, filter: &ItemFilter) -> String {
    let mut out = String::new();
    let items: Vec<&ScheduledItem> = roadmap.filtered_items(filter).collect();
    if items.is_empty() {
        out.push_str("(no items)\n");
        return out;
    }
    for item in items {
        let start = item.start_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        let end = item.end_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        let deps = if item.dependencies.is_empty() {
            "-".to_string()
        } else {
            item.dependencies.join(",")
        };
        out.push_str(&format!(
            "{:<10} {:<24} {:<10} {:<10} {:<8} {:>3}% deps={}\n",
            item.id, item.title, start, end, item.status, item.progress, deps
        ));
    }
    out
}

// Text rendering of the pixel layout: one character column per
// `width / TIMELINE_COLUMNS` pixels.
fn render_timeline(view: &TimelineView) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} view from {} to {} ({} buckets)\n",
        view.zoom,
        view.buckets
            .first()
            .map(|b| b.start_of_period.to_string())
            .unwrap_or_default(),
        view.buckets
            .last()
            .map(|b| b.end_of_period.to_string())
            .unwrap_or_default(),
        view.buckets.len()
    ));
    let labels = view
        .buckets
        .iter()
        .map(|b| b.label.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&format!("{labels}\n"));

    let scale = TIMELINE_COLUMNS / view.container_width;
    for bar in &view.bars {
        let lead = (bar.position.left * scale).round() as usize;
        let total = ((bar.position.width * scale).round() as usize).max(1);
        let filled = ((bar.progress_width * scale).round() as usize).min(total);
        out.push_str(&format!(
            "{:<10} {}{}{}\n",
            bar.item_id,
            " ".repeat(lead),
            "#".repeat(filled),
            "=".repeat(total - filled)
        ));
    }
    for flag in &view.flags {
        let note = match flag.kind {
            FlagKind::CircularDependency => "circular dependency",
            FlagKind::InvalidDependencyDates => "starts before a dependency ends",
        };
        out.push_str(&format!("warning: {} {}\n", flag.item_id, note));
    }
    out.push_str(&format!("({})\n", view.summary.to_cli_summary()));
    out
}

fn print_metadata(roadmap: &Roadmap) {
    let metadata = roadmap.metadata();
    println!("Roadmap name       : {}", metadata.name);
    println!("Roadmap description: {}", metadata.description);
    println!("Week starts on     : {}", roadmap.config().week_start());
}

fn rest_of_line<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

impl Session {
    fn handle(&mut self, input: &str) -> bool {
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => return false,
            "show" => print!("{}", render_items(&self.roadmap, &self.filter)),
            "add" => match parts.next() {
                Some(id) => {
                    let title = rest_of_line(parts);
                    let mut item = self
                        .roadmap
                        .find_item(id)
                        .cloned()
                        .unwrap_or_else(|| ScheduledItem::new(id, ""));
                    item.title = title;
                    match self.roadmap.upsert_item(item) {
                        Ok(()) => println!("Item {id} upserted."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                None => println!("Usage: add <id> <title...>"),
            },
            "dates" => match (parts.next(), parts.next(), parts.next()) {
                (Some(id), Some(start_s), Some(end_s)) => {
                    let (Some(start), Some(end)) = (parse_date(start_s), parse_date(end_s)) else {
                        println!("Invalid date (YYYY-MM-DD)");
                        return true;
                    };
                    match self.roadmap.set_dates(id, Some(start), Some(end)) {
                        Ok(()) => println!("Dates set for {id}."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: dates <id> <start> <end>"),
            },
            "deps" => match (parts.next(), parts.next()) {
                (Some(id), Some(list)) => {
                    match self.roadmap.set_dependencies(id, parse_dependency_list(list)) {
                        Ok(()) => println!("Dependencies set for {id}."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: deps <id> <a,b|->"),
            },
            "progress" => match (parts.next(), parts.next().map(str::parse::<i32>)) {
                (Some(id), Some(Ok(value))) => {
                    match self.roadmap.update_item_with(id, |item| item.progress = value) {
                        Ok(()) => println!("Progress set for {id}."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: progress <id> <0-100>"),
            },
            "status" => match (parts.next(), parts.next()) {
                (Some(id), Some(raw)) => match raw.parse::<ItemStatus>() {
                    Ok(status) => match self.roadmap.update_item_with(id, |item| item.status = status) {
                        Ok(()) => println!("Status set for {id}."),
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("Error: {e}"),
                },
                _ => println!("Usage: status <id> <status>"),
            },
            "kind" => match (parts.next(), parts.next()) {
                (Some(id), Some(raw)) => match raw.parse::<ItemKind>() {
                    Ok(kind) => match self.roadmap.update_item_with(id, |item| item.kind = kind) {
                        Ok(()) => println!("Kind set for {id}."),
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("Error: {e}"),
                },
                _ => println!("Usage: kind <id> <feature|story>"),
            },
            "product" => match (parts.next(), parts.next()) {
                (Some(id), Some(raw)) => {
                    let product_id = (raw != "-").then(|| raw.to_string());
                    match self
                        .roadmap
                        .update_item_with(id, |item| item.product_id = product_id)
                    {
                        Ok(()) => println!("Product set for {id}."),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: product <id> <product-id|->"),
            },
            "filter" => match (parts.next(), parts.next()) {
                (Some("show"), None) => println!("Filter: {}", self.filter),
                (Some("kind"), Some("-")) => {
                    self.filter.kind = None;
                    println!("Filter: {}", self.filter);
                }
                (Some("kind"), Some(raw)) => match raw.parse::<ItemKind>() {
                    Ok(kind) => {
                        self.filter.kind = Some(kind);
                        println!("Filter: {}", self.filter);
                    }
                    Err(e) => println!("Error: {e}"),
                },
                (Some("product"), Some(raw)) => {
                    self.filter.product_id = (raw != "-").then(|| raw.to_string());
                    println!("Filter: {}", self.filter);
                }
                _ => println!("Usage: filter <show|kind|product> [value|-]"),
            },
            "delete" => match parts.next() {
                Some(id) => {
                    if self.roadmap.delete_item(id) {
                        println!("Deleted item {id}.");
                    } else {
                        println!("Item {id} not found.");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "zoom" => match parts.next().map(ZoomLevel::from_str) {
                Some(Ok(zoom)) => {
                    self.zoom = zoom;
                    println!("Zoom set to {zoom}.");
                }
                Some(Err(e)) => println!("Error: {e}"),
                None => println!("Usage: zoom <year|month|sprint|week>"),
            },
            "ref" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    self.reference = date;
                    println!("Reference date set to {date}.");
                }
                None => println!("Usage: ref <YYYY-MM-DD>"),
            },
            "width" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(width)) if width.is_finite() && width > 0.0 => {
                    self.width = width;
                    println!("Container width set to {width}.");
                }
                _ => println!("Usage: width <px>"),
            },
            "week" => match parts.next().map(Weekday::from_str) {
                Some(Ok(day @ (Weekday::Mon | Weekday::Sun))) => {
                    let mut config = *self.roadmap.config();
                    config.set_week_start(day);
                    self.roadmap.set_config(config);
                    println!("Weeks start on {day}.");
                }
                _ => println!("Usage: week <Mon|Sun>"),
            },
            "timeline" => {
                let view = self.roadmap.filtered_timeline(
                    self.reference,
                    self.zoom,
                    self.width,
                    &self.filter,
                );
                print!("{}", render_timeline(&view));
            }
            "validate" => {
                let flags = self.roadmap.validate();
                if flags.is_empty() {
                    println!("No dependency warnings.");
                }
                for flag in flags {
                    println!("{} {}", flag.item_id, flag.kind);
                }
                for group in self.roadmap.cycle_groups() {
                    println!("cycle: {}", group.join(" -> "));
                }
            }
            "order" => match self.roadmap.dependency_order() {
                Ok(order) => println!("Order: {}", order.join(", ")),
                Err(e) => println!("Error: {e}"),
            },
            "rice" => {
                let values = parts.map(str::parse::<f64>).collect::<Result<Vec<_>, _>>();
                match values.as_deref() {
                    Ok([reach, impact, confidence, effort]) => {
                        match RiceScore::compute(*reach, *impact, *confidence, *effort) {
                            Some(rice) => println!("RICE score: {:.2}", rice.score),
                            None => println!("Error: effort must be positive and inputs non-negative"),
                        }
                    }
                    _ => println!("Usage: rice <reach> <impact> <confidence> <effort>"),
                }
            }
            "meta" => match parts.next() {
                Some("show") => print_metadata(&self.roadmap),
                Some("name") => {
                    self.roadmap.set_name(rest_of_line(parts));
                    println!("Roadmap name updated.");
                }
                Some("desc") => {
                    self.roadmap.set_description(rest_of_line(parts));
                    println!("Roadmap description updated.");
                }
                _ => println!("Usage: meta <show|name|desc> [text...]"),
            },
            "save" => match parts.next() {
                Some(path) => match save_roadmap_to_json(&self.roadmap, path) {
                    Ok(()) => println!("Roadmap saved to {path}."),
                    Err(e) => println!("Error saving roadmap: {e}"),
                },
                None => println!("Usage: save <path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_roadmap_from_json(path) {
                    Ok(roadmap) => {
                        self.roadmap = roadmap;
                        println!("Roadmap loaded from {path}.");
                    }
                    Err(e) => println!("Error loading roadmap: {e}"),
                },
                None => println!("Usage: load <path>"),
            },
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
        true
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let mut session = Session {
        roadmap: Roadmap::new(),
        zoom: ZoomLevel::default(),
        reference: Utc::now().date_naive(),
        width: 960.0,
        filter: ItemFilter::default(),
    };

    println!("Roadmap Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if !session.handle(input) {
            break;
        }
    }
    Ok(())
}
