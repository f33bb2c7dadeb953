use chrono::Utc;
use clap::Parser;
use colored::*;
use console::Term;
use directories::ProjectDirs;
use platen::app::App;
use platen::compose::{compose, ComposeBuffer};
use platen::config::PlatenConfig;
use platen::editor::ConfirmPrompt;
use platen::error::{PlatenError, Result};
use platen::model::{ContentItem, ContentType, SiteData};
use platen::render::tree::TreeSurface;
use platen::render::{Anchor, NodeId, UiAction};
use platen::router::{resolve_address, AddressBar, InMemoryAddressBar, Route};
use platen::store::fs::FileStore;
use platen::store::ContentStore;
use platen::widget::{BufferWidgetFactory, RichTextWidget};
use std::path::PathBuf;
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    store: ContentStore<FileStore>,
    config: PlatenConfig,
    site_dir: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Init) => handle_init(&mut ctx),
        Some(Commands::List { kind }) => handle_list(&ctx, kind),
        Some(Commands::Show { address }) => handle_show(&ctx, address),
        Some(Commands::New {
            title,
            content,
            no_editor,
        }) => handle_new(&mut ctx, title, content, no_editor),
        Some(Commands::Edit { target }) => handle_edit(&mut ctx, target),
        Some(Commands::Delete { slug, yes }) => handle_delete(&mut ctx, slug, yes),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        Some(Commands::Admin) => handle_admin(ctx),
        None => handle_list(&ctx, None),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let site_dir = match &cli.site {
        Some(dir) => dir.clone(),
        None => {
            let proj_dirs = ProjectDirs::from("com", "platen", "platen")
                .expect("Could not determine data dir");
            proj_dirs.data_dir().to_path_buf()
        }
    };

    let config = PlatenConfig::load(&site_dir).unwrap_or_default();
    let store = ContentStore::new(FileStore::new(&site_dir));

    Ok(AppContext {
        store,
        config,
        site_dir,
    })
}

fn handle_init(ctx: &mut AppContext) -> Result<()> {
    if ctx.store.backend().site_path().exists() {
        println!("Site already initialized at {}", ctx.site_dir.display());
        return Ok(());
    }

    ctx.store.save(&SiteData::starter())?;
    println!(
        "{}",
        format!("Initialized a new site at {}", ctx.site_dir.display()).green()
    );
    println!("Try: platen list, platen show, platen admin");
    Ok(())
}

fn handle_list(ctx: &AppContext, kind: Option<String>) -> Result<()> {
    let data = ctx.store.load()?;

    let kinds: Vec<ContentType> = match kind.as_deref() {
        Some(name) => match ContentType::parse(name) {
            Some(kind) => vec![kind],
            None => {
                return Err(PlatenError::Invalid(format!(
                    "Unknown content type: {}",
                    name
                )))
            }
        },
        None => ContentType::ALL.to_vec(),
    };

    let items: Vec<&ContentItem> = kinds
        .iter()
        .flat_map(|kind| data.collection(*kind))
        .collect();
    print_items(&items);
    Ok(())
}

fn handle_show(ctx: &AppContext, address: Option<String>) -> Result<()> {
    let data = ctx.store.load()?;
    let raw = address.unwrap_or_default();

    match resolve_address(&data, &raw, &ctx.config.landing_slug) {
        Some(item) => print_full_item(&item),
        None => println!("Nothing to show; the site is empty."),
    }
    Ok(())
}

fn handle_new(
    ctx: &mut AppContext,
    title: Option<String>,
    content: Option<String>,
    no_editor: bool,
) -> Result<()> {
    let (final_title, final_content) = if no_editor {
        (title.unwrap_or_default(), content.unwrap_or_default())
    } else {
        let initial = ComposeBuffer::new(title.unwrap_or_default(), content.unwrap_or_default());
        let edited = compose(&initial, ctx.config.get_file_ext())?;
        (edited.title, edited.content)
    };

    if final_title.is_empty() {
        return Err(PlatenError::Invalid("Title cannot be empty".into()));
    }

    let mut draft = ContentItem::placeholder();
    draft.title = final_title;
    draft.content = final_content;
    let stored = ctx.store.upsert(&draft)?;

    println!(
        "{}",
        format!("Created post at #{}", Route::for_item(&stored).fragment()).green()
    );
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, target: String) -> Result<()> {
    let data = ctx.store.load()?;
    let item = resolve_target(&data, &target)?;

    let initial = ComposeBuffer::new(item.title.clone(), item.content.clone());
    let edited = compose(&initial, ctx.config.get_file_ext())?;
    if edited.title.is_empty() {
        return Err(PlatenError::Invalid("Title cannot be empty".into()));
    }

    let mut updated = item;
    // Settings keep their names; only the value is editable.
    if updated.kind != ContentType::Setting {
        updated.title = edited.title;
    }
    updated.content = edited.content;
    let stored = ctx.store.upsert(&updated)?;

    println!(
        "{}",
        format!("Updated {} \"{}\"", stored.kind, stored.title).green()
    );
    Ok(())
}

/// Accepts an address fragment ("blog/hello") or a bare slug ("hello").
fn resolve_target(data: &SiteData, target: &str) -> Result<ContentItem> {
    let route = Route::from_fragment(target);
    let (kind, slug) = route.target();
    if let Some(item) = data.find(kind, slug) {
        return Ok(item.clone());
    }

    for kind in ContentType::ALL {
        if let Some(item) = data.find(kind, target) {
            return Ok(item.clone());
        }
    }

    Err(PlatenError::ItemNotFound(kind, slug.to_string()))
}

fn handle_delete(ctx: &mut AppContext, slug: String, yes: bool) -> Result<()> {
    let data = ctx.store.load()?;
    let post = data
        .find(ContentType::Post, &slug)
        .cloned()
        .ok_or_else(|| PlatenError::ItemNotFound(ContentType::Post, slug.clone()))?;

    if !yes {
        let mut prompt = TermConfirm::new();
        if !prompt.confirm(&format!("Delete \"{}\"?", post.title)) {
            println!("Aborted.");
            return Ok(());
        }
    }

    let id = post
        .id
        .ok_or_else(|| PlatenError::Store(format!("Post \"{}\" has no id", post.slug)))?;
    let removed = ctx.store.delete_post(id)?;
    println!("{}", format!("Deleted \"{}\"", removed.title).green());
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key.as_deref(), value) {
        (None, _) => {
            println!("file-ext = {}", ctx.config.get_file_ext());
            println!("landing-slug = {}", ctx.config.landing_slug);
        }
        (Some("file-ext"), None) => println!("file-ext = {}", ctx.config.get_file_ext()),
        (Some("file-ext"), Some(v)) => {
            ctx.config.set_file_ext(&v);
            ctx.config.save(&ctx.site_dir)?;
            println!("file-ext = {}", ctx.config.get_file_ext());
        }
        (Some("landing-slug"), None) => println!("landing-slug = {}", ctx.config.landing_slug),
        (Some("landing-slug"), Some(v)) => {
            ctx.config.landing_slug = v;
            ctx.config.save(&ctx.site_dir)?;
            println!("landing-slug = {}", ctx.config.landing_slug);
        }
        (Some(other), _) => println!("Unknown config key: {}", other),
    }
    Ok(())
}

type AdminApp = App<FileStore, TreeSurface, InMemoryAddressBar, TermConfirm, BufferWidgetFactory>;

fn handle_admin(ctx: AppContext) -> Result<()> {
    let mut app = App::new(
        FileStore::new(&ctx.site_dir),
        TreeSurface::new(),
        InMemoryAddressBar::new(),
        TermConfirm::new(),
        BufferWidgetFactory::new(),
    )
    .with_landing_slug(&ctx.config.landing_slug);
    app.boot()?;

    let term = Term::stdout();
    loop {
        app.tick(Instant::now());
        let menu = render_admin(&term, &app)?;

        let input = term.read_line().map_err(PlatenError::Io)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "q" {
            break;
        }
        if input == "e" {
            compose_current(&mut app, ctx.config.get_file_ext())?;
            continue;
        }
        if let Some(text) = input.strip_prefix("title ") {
            app.dispatch(UiAction::TitleInput(text.trim().to_string()))?;
            continue;
        }
        if let Some(markup) = input.strip_prefix("body ") {
            app.dispatch(UiAction::ContentInput(markup.trim().to_string()))?;
            continue;
        }
        if let Ok(n) = input.parse::<usize>() {
            if n >= 1 && n <= menu.len() {
                app.dispatch(menu[n - 1].clone())?;
            }
            continue;
        }
    }
    Ok(())
}

/// Round-trips the edit session through the user's text editor.
fn compose_current(app: &mut AdminApp, file_ext: &str) -> Result<()> {
    let item = match &app.editor().session().current {
        Some(item) => item.clone(),
        None => return Ok(()),
    };

    let initial = ComposeBuffer::new(item.title.clone(), item.content.clone());
    let edited = compose(&initial, file_ext)?;
    if item.kind != ContentType::Setting && !edited.title.is_empty() {
        app.dispatch(UiAction::TitleInput(edited.title))?;
    }
    app.dispatch(UiAction::ContentInput(edited.content))?;
    Ok(())
}

/// Draws one frame of the admin screen from the render surface and returns
/// the numbered menu of dispatchable actions.
fn render_admin(term: &Term, app: &AdminApp) -> Result<Vec<UiAction>> {
    term.clear_screen().map_err(PlatenError::Io)?;
    let surface = app.surface();
    let mut menu = Vec::new();

    let name = surface.text_of(Anchor::SiteName);
    if !name.is_empty() {
        println!("{}", name.bold());
    }
    let description = surface.text_of(Anchor::SiteDescription);
    if !description.is_empty() {
        println!("{}", description.dimmed());
    }
    println!("{}", format!("#{}", app.address().fragment()).dimmed());
    println!();

    print_tree(surface, Anchor::MainNav, &mut menu, 0);
    println!();

    let title = surface.text_of(Anchor::PageTitle);
    if !title.is_empty() {
        println!("{}", title.bold());
    }
    print_tree(surface, Anchor::PageContent, &mut menu, 0);
    println!();
    print_tree(surface, Anchor::EditorToggle, &mut menu, 0);

    if app.editor().is_open() {
        println!("{}", "─".repeat(48).dimmed());
        print_tree(surface, Anchor::Breadcrumb, &mut menu, 0);
        print_tree(surface, Anchor::NavPrimary, &mut menu, 0);
        print_tree(surface, Anchor::SecondaryList, &mut menu, 0);
        print_tree(surface, Anchor::AddNew, &mut menu, 0);

        if app.editor().session().current.is_some() {
            let locked = surface.attr_of(Anchor::EditTitle, "readonly").is_some();
            let marker = if locked { " (locked)" } else { "" };
            println!("Title: {}{}", surface.text_of(Anchor::EditTitle), marker);
            if let Some(widget) = app.editor().widget() {
                let body = strip_tags(&widget.read());
                println!("Body:  {}", truncate_to_width(body.trim(), 70));
            }
            print_tree(surface, Anchor::SaveButton, &mut menu, 0);
            print_tree(surface, Anchor::DeleteButton, &mut menu, 0);
            println!(
                "{}",
                "title <text> / body <markup> / e composes in $EDITOR".dimmed()
            );
        }
    }

    println!();
    println!("{}", "number selects, q quits".dimmed());
    Ok(menu)
}

fn print_tree(surface: &TreeSurface, anchor: Anchor, menu: &mut Vec<UiAction>, indent: usize) {
    if let Some(id) = surface.anchor_id(anchor) {
        print_node(surface, id, menu, indent);
    }
}

fn print_node(surface: &TreeSurface, id: NodeId, menu: &mut Vec<UiAction>, indent: usize) {
    let node = surface.node(id);
    if node.classes.contains("hidden") {
        return;
    }

    let text = if node.rich {
        strip_tags(&node.text)
    } else {
        node.text.clone()
    };
    let text = text.trim().to_string();

    if let Some(action) = &node.binding {
        let label = if text.is_empty() {
            action_label(action).to_string()
        } else {
            text
        };
        menu.push(action.clone());
        println!("{}[{}] {}", "  ".repeat(indent), menu.len(), label);
    } else if !text.is_empty() {
        println!("{}{}", "  ".repeat(indent), text);
    }

    for child in &node.children {
        print_node(surface, *child, menu, indent + 1);
    }
}

/// Label for a bound node that carries no text of its own.
fn action_label(action: &UiAction) -> &'static str {
    match action {
        UiAction::Navigate(_) => "Go",
        UiAction::ToggleEditor => "Admin",
        UiAction::EditorHome => "Back",
        UiAction::ChooseType(_) => "Browse",
        UiAction::OpenItem(..) => "Open",
        UiAction::NewPost => "+ Add New",
        UiAction::Save => "Save",
        UiAction::Delete => "Delete",
        UiAction::TitleInput(_) | UiAction::ContentInput(_) => "Edit",
    }
}

/// Confirmation prompt over the terminal.
struct TermConfirm {
    term: Term,
}

impl TermConfirm {
    fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl ConfirmPrompt for TermConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        if self.term.write_str(&format!("{} [y/N] ", message)).is_err() {
            return false;
        }
        match self.term.read_line() {
            Ok(answer) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

fn print_full_item(item: &ContentItem) {
    let address = format!("#{}", Route::for_item(item).fragment());
    println!("{} {}", address.yellow(), item.title.bold());
    println!("--------------------------------");
    let body = strip_tags(&item.content);
    let body = body.trim();
    if !body.is_empty() {
        println!("{}", body);
    }
}

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;

fn print_items(items: &[&ContentItem]) {
    if items.is_empty() {
        println!("No content found.");
        return;
    }

    let address_width = items
        .iter()
        .map(|item| Route::for_item(item).fragment().width())
        .max()
        .unwrap_or(0);

    let mut last_kind: Option<ContentType> = None;
    for item in items {
        if last_kind.is_some() && last_kind != Some(item.kind) {
            println!();
        }
        last_kind = Some(item.kind);

        let address = format!(
            "{:<width$}",
            Route::for_item(item).fragment(),
            width = address_width
        );
        let address_colored = match item.kind {
            ContentType::Post => address.normal(),
            ContentType::Page => address.cyan(),
            ContentType::Setting => address.yellow(),
        };

        let preview: String = strip_tags(&item.content)
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let title_content = if preview.trim().is_empty() {
            item.title.clone()
        } else {
            format!("{} {}", item.title, preview.trim())
        };

        let fixed_width = 2 + address_width + 2 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&title_content, available);
        let padding = available.saturating_sub(title_display.width());

        let time_ago = format_time_ago(item.modified);

        println!(
            "  {}  {}{}{}",
            address_colored,
            title_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

/// Drops anything between angle brackets, for terminal previews of markup.
fn strip_tags(markup: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: chrono::DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(timestamp);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    let time_str = time_str
        .replace("hour ago", "hour  ago")
        .replace("minute ago", "minute  ago")
        .replace("second ago", "second  ago")
        .replace("day ago", "day  ago")
        .replace("week ago", "week  ago")
        .replace("month ago", "month  ago")
        .replace("year ago", "year  ago");

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
