//! Website command handlers.

use std::cell::Cell;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use sitenav_core::{
    CardDelegate, Category, Directory, LikeOutcome, ModerationStatus, Route, StatusFilter,
    Website, WebsiteCard, WebsiteDraft, WebsiteId, WebsiteQuery,
};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand, StatusArg, SubmitArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WebsiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Likes")]
    likes: i64,
    #[tabled(rename = "Visits")]
    visits: i64,
}

impl WebsiteRow {
    fn new(w: &Website, categories: &[Arc<Category>], color: bool) -> Self {
        Self {
            id: w.id.to_string(),
            title: w.title.clone(),
            url: w.url.clone(),
            category: Category::name_for(categories.iter().map(|c| &**c), w.category_id),
            status: output::status_label(w.status, color),
            likes: w.likes,
            visits: w.visits,
        }
    }
}

fn detail(w: &Website, categories: &[Arc<Category>], color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", w.id),
        format!("Title:       {}", w.title),
        format!("URL:         {}", w.url),
        format!(
            "Category:    {}",
            Category::name_for(categories.iter().map(|c| &**c), w.category_id)
        ),
        format!("Status:      {}", output::status_label(w.status, color)),
        format!("Likes:       {}", w.likes),
        format!("Visits:      {}", w.visits),
    ];
    if !w.description.is_empty() {
        lines.push(format!("Description: {}", w.description));
    }
    if let Some(ref thumb) = w.thumbnail {
        lines.push(format!("Thumbnail:   {thumb}"));
    }
    if let Some(created) = w.created_at {
        lines.push(format!(
            "Created:     {}",
            created.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    lines.join("\n")
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => Self::All,
            StatusArg::Pending => Self::Pending,
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

// ── Card delegate ───────────────────────────────────────────────────

/// Captures what a card asks its container to do, for the handler to
/// carry out afterwards.
#[derive(Default)]
struct Requests {
    visit: Cell<Option<WebsiteId>>,
    status: Cell<Option<(WebsiteId, ModerationStatus)>>,
}

impl CardDelegate for Requests {
    fn on_visit(&self, website: &Website) {
        self.visit.set(Some(website.id));
    }

    fn on_status_update(&self, id: WebsiteId, status: ModerationStatus) {
        self.status.set(Some((id, status)));
    }
}

/// Fetch one entry and wrap it in a card.
async fn load_card(directory: &Directory, raw_id: &str) -> Result<WebsiteCard, CliError> {
    let id = util::parse_website_id(raw_id)?;
    directory.website(id).await?;
    directory.card(id).ok_or_else(|| CliError::NotFound {
        resource_type: "website".into(),
        identifier: raw_id.into(),
        list_command: "sites list".into(),
    })
}

/// Category labels are cosmetic outside of submit; a failed load only
/// degrades them to "Uncategorized".
async fn load_categories_for_display(directory: &Directory) {
    if let Err(e) = directory.load_categories().await {
        tracing::warn!(error = %e, "categories unavailable, labels will fall back");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &Directory,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        SitesCommand::List {
            status,
            category,
            search,
        } => {
            let category = match category {
                Some(ref ident) => {
                    directory.load_categories().await?;
                    let cats = directory.store().categories_snapshot();
                    Some(util::resolve_category(&cats, ident)?)
                }
                None => {
                    load_categories_for_display(directory).await;
                    None
                }
            };

            let status = StatusFilter::from(status);
            if !directory.role().is_admin() && status != StatusFilter::Approved && !global.quiet {
                eprintln!("Only approved websites are listed without an admin profile");
            }

            directory
                .refresh_websites(&WebsiteQuery {
                    status,
                    category,
                    search,
                })
                .await?;

            let cats = directory.store().categories_snapshot();
            let snap = directory.store().websites_snapshot();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |w| WebsiteRow::new(w, &cats, color),
                |w| w.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { id } => {
            load_categories_for_display(directory).await;
            let card = load_card(directory, &id).await?;
            let cats = directory.store().categories_snapshot();
            let out = output::render_single(
                &global.output,
                card.website(),
                |w| detail(w, &cats, color),
                |w| w.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Submit(submit) => handle_submit(directory, submit, global, color).await,

        SitesCommand::Like { id } => {
            let mut card = load_card(directory, &id).await?;
            match directory.like(&mut card) {
                LikeOutcome::AlreadyLiked { toast } => {
                    output::print_toast(&toast, global.quiet, color);
                }
                LikeOutcome::Liked { likes, request } => {
                    // The process would cancel the detached request on exit.
                    if let Err(e) = request.await {
                        tracing::debug!(error = %e, "like request task did not finish");
                    }
                    if !global.quiet {
                        eprintln!("Liked ({likes} likes)");
                    }
                }
            }
            Ok(())
        }

        SitesCommand::Visit { id } => {
            let card = load_card(directory, &id).await?;
            let visited = {
                let requests = Requests::default();
                card.visit(&requests);
                requests.visit.get()
            };
            if let Some(visited) = visited {
                if let Err(e) = directory.record_visit(visited).await {
                    tracing::warn!(error = %e, "visit was not recorded");
                }
            }
            output::print_output(&card.website().url, global.quiet);
            Ok(())
        }

        SitesCommand::Approve { id } => {
            moderate(directory, &id, ModerationStatus::Approved, global).await
        }

        SitesCommand::Reject { id } => {
            moderate(directory, &id, ModerationStatus::Rejected, global).await
        }
    }
}

async fn moderate(
    directory: &Directory,
    raw_id: &str,
    target: ModerationStatus,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !directory.role().is_admin() {
        return Err(CliError::AdminRequired);
    }

    let card = load_card(directory, raw_id).await?;
    if !card.available_transitions().contains(&target) {
        return Err(CliError::Validation {
            field: "status".into(),
            reason: format!("website {raw_id} is already {}", card.website().status),
        });
    }

    let verb = if target == ModerationStatus::Approved {
        "Approve"
    } else {
        "Reject"
    };
    if !util::confirm(
        &format!("{verb} '{}' ({})?", card.website().title, card.website().url),
        global.yes,
    )? {
        return Ok(());
    }

    let requested = {
        let requests = Requests::default();
        card.request_status(target, &requests);
        requests.status.get()
    };
    if let Some((id, status)) = requested {
        directory.set_status(id, status).await?;
        if !global.quiet {
            eprintln!("Website {id} {status}");
        }
    }
    Ok(())
}

// ── Submit ──────────────────────────────────────────────────────────

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn handle_submit(
    directory: &Directory,
    args: SubmitArgs,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    directory.load_settings().await;
    directory.load_categories().await?;

    let cats = directory.store().categories_snapshot();
    let category_id = args
        .category
        .as_deref()
        .map(|ident| util::resolve_category(&cats, ident))
        .transpose()?;

    let mut draft = WebsiteDraft {
        url: args.url,
        category_id,
        ..WebsiteDraft::new()
    };

    if args.autofill {
        if directory.submission().autofill_available(&draft) {
            let pb = (!global.quiet).then(|| spinner("Fetching page metadata..."));
            let result = directory.autofill(&draft).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            match result {
                Ok(Some(outcome)) => {
                    draft.apply_metadata(&outcome.metadata);
                    output::print_toast(&outcome.toast, global.quiet, color);
                }
                Ok(None) => {}
                // Non-fatal: explicit flags or the schema check take over.
                Err(e) => output::print_toast(&e.toast(), global.quiet, color),
            }
        } else if !global.quiet {
            eprintln!("Auto-fill needs a URL starting with http:// or https://");
        }
    }

    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(thumbnail) = args.thumbnail {
        draft.thumbnail = thumbnail;
    }

    let outcome = directory.submit(&draft).await?.ok_or(CliError::Busy)?;

    output::print_toast(&outcome.toast, global.quiet, color);
    if let Some(website) = &outcome.website {
        let out = output::render_single(
            &global.output,
            website,
            |w| detail(w, &cats, color),
            |w| w.id.to_string(),
        );
        output::print_output(&out, global.quiet);
    }
    if !global.quiet {
        let next = match outcome.route {
            Route::Home => "sitenav sites list",
            Route::ModerationQueue => "sitenav sites list --status all",
        };
        eprintln!("Next: {next}");
    }
    Ok(())
}
