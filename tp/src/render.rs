//! Terminal rendering for plans, errors and chat turns
//!
//! Plans and answers arrive as markdown. It is parsed with pulldown-cmark and
//! the events are written out with terminal styling: headings, emphasis,
//! links (text followed by the URL), lists, code blocks and aligned tables.

use colored::{ColoredString, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::domain::{Author, ChatTurn};
use crate::session::{ResultArea, TripController};

/// Style a markdown document for the terminal
pub fn markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut writer = MarkdownWriter::default();
    for event in Parser::new_ext(text, options) {
        writer.event(event);
    }
    writer.finish()
}

/// Accumulates styled output while walking parser events
#[derive(Default)]
struct MarkdownWriter {
    out: String,
    heading: Option<HeadingLevel>,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    links: Vec<String>,
    // One entry per open list; `Some(n)` is the next number of an ordered list
    lists: Vec<Option<u64>>,
    code_block: bool,
    table: Option<Table>,
}

#[derive(Default)]
struct Table {
    rows: Vec<Vec<Cell>>,
    header_rows: usize,
    in_head: bool,
    row: Vec<Cell>,
    cell: Cell,
}

/// Styled cell text plus its visible width
#[derive(Default)]
struct Cell {
    text: String,
    width: usize,
}

impl MarkdownWriter {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let code: &str = &code;
                self.push_inline(&code.yellow().to_string(), code.chars().count());
            }
            Event::SoftBreak | Event::HardBreak => self.line_break(),
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::Rule => {
                self.blank_line();
                self.out.push_str(&"─".repeat(40).dimmed().to_string());
                self.blank_line();
            }
            Event::TaskListMarker(done) => self.push_inline(if done { "[x] " } else { "[ ] " }, 4),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.blank_line();
                self.heading = Some(level);
            }
            Tag::List(first) => {
                self.newline();
                self.lists.push(first);
            }
            Tag::Item => self.start_item(),
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            Tag::CodeBlock(_) => {
                self.newline();
                self.code_block = true;
            }
            Tag::Table(_) => {
                self.newline();
                self.table = Some(Table::default());
            }
            Tag::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = true;
                }
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.heading = None;
                self.newline();
            }
            TagEnd::Paragraph | TagEnd::CodeBlock => {
                self.code_block = false;
                if self.lists.is_empty() {
                    self.blank_line();
                } else {
                    self.newline();
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => self.newline(),
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => {
                if let Some(url) = self.links.pop()
                    && !url.is_empty()
                {
                    let suffix = format!(" ({})", url);
                    self.push_inline(&suffix.dimmed().to_string(), suffix.chars().count());
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell);
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                    if table.in_head {
                        table.header_rows = table.rows.len();
                        table.in_head = false;
                    }
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.write_table(table);
                    self.blank_line();
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code_block {
            for line in text.lines() {
                self.out.push_str("    ");
                self.out.push_str(&line.yellow().to_string());
                self.out.push('\n');
            }
            return;
        }
        let styled = self.style(text).to_string();
        self.push_inline(&styled, text.chars().count());
    }

    fn style(&self, text: &str) -> ColoredString {
        let mut styled = match self.heading {
            Some(HeadingLevel::H1) => text.bright_cyan().bold().underline(),
            Some(HeadingLevel::H2) => text.bright_cyan().bold(),
            Some(_) => text.cyan().bold(),
            None => text.normal(),
        };
        if self.strong > 0 || self.table.as_ref().is_some_and(|t| t.in_head) {
            styled = styled.bold();
        }
        if self.emphasis > 0 {
            styled = styled.italic();
        }
        if self.strikethrough > 0 {
            styled = styled.strikethrough();
        }
        if !self.links.is_empty() {
            styled = styled.blue().underline();
        }
        styled
    }

    fn html(&mut self, html: &str) {
        // Only line breaks carry meaning on a terminal; table cells use them as separators
        if !html.trim().to_ascii_lowercase().starts_with("<br") {
            return;
        }
        if self.table.is_some() {
            self.push_inline(", ", 2);
        } else {
            self.line_break();
        }
    }

    fn push_inline(&mut self, styled: &str, width: usize) {
        match self.table.as_mut() {
            Some(table) => {
                table.cell.text.push_str(styled);
                table.cell.width += width;
            }
            None => self.out.push_str(styled),
        }
    }

    fn start_item(&mut self) {
        self.newline();
        let depth = self.lists.len().saturating_sub(1);
        self.out.push_str(&"  ".repeat(depth));
        match self.lists.last_mut() {
            Some(Some(number)) => {
                self.out.push_str(&format!("{}. ", number));
                *number += 1;
            }
            _ => {
                self.out.push_str(&"•".yellow().to_string());
                self.out.push(' ');
            }
        }
    }

    fn line_break(&mut self) {
        if self.table.is_some() {
            self.push_inline(" ", 1);
            return;
        }
        self.out.push('\n');
        self.out.push_str(&"  ".repeat(self.lists.len()));
    }

    fn newline(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn blank_line(&mut self) {
        if self.out.is_empty() {
            return;
        }
        self.newline();
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn write_table(&mut self, table: Table) {
        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(c))
                    .map(|cell| cell.width)
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let separator = " │ ".dimmed().to_string();

        for (i, row) in table.rows.iter().enumerate() {
            let line = widths
                .iter()
                .enumerate()
                .map(|(c, width)| {
                    let (text, used) = row.get(c).map_or(("", 0), |cell| (cell.text.as_str(), cell.width));
                    format!("{}{}", text, " ".repeat(width - used))
                })
                .collect::<Vec<_>>()
                .join(&separator);
            self.out.push_str(line.trim_end());
            self.out.push('\n');

            if i + 1 == table.header_rows {
                let rule = widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─");
                self.out.push_str(&rule.dimmed().to_string());
                self.out.push('\n');
            }
        }
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}

/// Print the loading indicator
pub fn print_loading() {
    println!("{}", "Generating your travel plan...".dimmed());
}

/// Print the controller's result area and any pending alert
pub fn print_trip(controller: &mut TripController) {
    if let Some(alert) = controller.take_alert() {
        print_alert(&alert);
    }

    match controller.result() {
        ResultArea::Hidden => {}
        ResultArea::Plan { plan, flight_details } => {
            println!();
            println!("{}", markdown(plan));
            if let Some(flights) = flight_details {
                print_flights(flights);
            }
            println!();
        }
        ResultArea::Error(error) => {
            println!();
            println!("{} {}", "Error:".red().bold(), error.red());
            println!();
        }
    }
}

/// Print a flight details section
pub fn print_flights(flights: &str) {
    println!();
    println!("{}", "Flight Details".bright_magenta().bold());
    println!("{}", markdown(flights));
}

/// Print a blocking, generic alert
pub fn print_alert(message: &str) {
    eprintln!("{} {}", "!".red().bold(), message.red());
}

/// Print one chat turn
pub fn print_turn(turn: &ChatTurn) {
    match turn.author {
        Author::User => println!("{} {}", format!("{}:", turn.author).bright_green(), turn.text),
        Author::Assistant => {
            println!("{}", format!("{}:", turn.author).bright_blue());
            println!("{}", markdown(&turn.text));
            if let Some(flights) = &turn.flight_details {
                print_flights(flights);
            }
        }
    }
}
