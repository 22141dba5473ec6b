use super::config::Config;
use super::errors::{Result, WatchError};
use super::git_ops::{CommitInfo, CommitSource, GitCommitSource, WATCH_BRANCH};
use super::logger::Logger;
use super::mailer::{Notifier, SmtpNotifier};
use super::page::{extract_page_name, FALLBACK_PAGE};
use super::run_state::{LoadedState, RunState, RunStateStore};
use chrono::{DateTime, Local};

/// Fixed, working-directory-relative inputs. The program takes no arguments.
pub const CONFIG_FILE: &str = "config.yaml";
pub const RUN_FILE: &str = "runfile.yaml";

/// Built once at startup and passed down; no ambient globals.
pub struct WatchContext {
    pub config: Config,
    pub logger: Logger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    Sent,
    Failed(String),
}

/// Per-commit record of what the loop tried to do, kept so the caller (and
/// the tests) can see the whole picture instead of a silent catch-and-continue.
#[derive(Debug, Clone)]
pub struct NotifyAttempt {
    pub commit_id: String,
    pub page: String,
    pub author: String,
    pub status: SendStatus,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub attempts: Vec<NotifyAttempt>,
}

impl RunSummary {
    pub fn sent(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.status == SendStatus::Sent)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempts.len() - self.sent()
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    /// No runfile existed; one was created and nothing was processed.
    FirstRun,
    /// A full pass over the window, successful even if every send failed.
    Completed(RunSummary),
}

pub fn run() -> Result<RunOutcome> {
    let config = Config::load(CONFIG_FILE)?;
    let logger = Logger::open(&config.logfile)?;
    let ctx = WatchContext { config, logger };

    let store = RunStateStore::new(RUN_FILE);
    let notifier = SmtpNotifier::from_config(&ctx.config);
    let repo_dir = ctx.config.repo_dir.clone();
    run_watch(
        &ctx,
        &store,
        move || GitCommitSource::open(&repo_dir),
        &notifier,
        Local::now(),
    )
}

/// The whole state machine for one invocation. Generic over the commit
/// source and the notifier so tests can drive it with fakes; the source is
/// built lazily because the first-run and clock checks must not touch the
/// repository.
pub fn run_watch<S, N, F>(
    ctx: &WatchContext,
    store: &RunStateStore,
    open_source: F,
    notifier: &N,
    now: DateTime<Local>,
) -> Result<RunOutcome>
where
    S: CommitSource,
    N: Notifier,
    F: FnOnce() -> Result<S>,
{
    let init_time = now.timestamp();
    ctx.logger.log(&format!("Initialized. Now: {init_time}"))?;

    let previous = match store.load()? {
        LoadedState::Found(state) => state,
        LoadedState::NotFound => {
            ctx.logger.log("First run, just creating runfile and exiting.")?;
            ctx.logger.log(&format!(
                "Tracking new commits from this moment in time: {}",
                now.format("%Y-%m-%dT%H:%M:%S%.6f")
            ))?;
            save_watermark(ctx, store, init_time)?;
            return Ok(RunOutcome::FirstRun);
        }
    };

    let lastrun = previous.lastrun;
    ctx.logger.log(&format!("Last run: {lastrun}"))?;
    let delta = init_time - lastrun;
    ctx.logger.log(&format!("Time delta: {delta}"))?;
    if delta < 0 {
        ctx.logger
            .log("ERROR: Time delta less than zero. Did the system time change?")?;
        return Err(WatchError::ClockRegression {
            lastrun,
            now: init_time,
        });
    }

    // Watermark before the loop: a crash mid-loop must not re-notify these
    // commits on the next run.
    save_watermark(ctx, store, init_time)?;

    let source = open_source()?;
    let summary = process_commits(ctx, &source, notifier, lastrun, init_time)?;
    Ok(RunOutcome::Completed(summary))
}

fn save_watermark(ctx: &WatchContext, store: &RunStateStore, lastrun: i64) -> Result<()> {
    match store.save(&RunState { lastrun }) {
        Ok(()) => ctx.logger.log("Writing runfile"),
        Err(error) => {
            ctx.logger.log("ERROR - Unable to write runfile.")?;
            Err(error)
        }
    }
}

/// Notifies every commit committed strictly inside `(lastrun, init_time)`,
/// in source order. Send failures are recorded and do not stop the loop.
fn process_commits<S: CommitSource, N: Notifier>(
    ctx: &WatchContext,
    source: &S,
    notifier: &N,
    lastrun: i64,
    init_time: i64,
) -> Result<RunSummary> {
    let commits = source.commits(WATCH_BRANCH)?;
    let mut summary = RunSummary::default();
    for commit in &commits {
        if commit.committed_at <= lastrun || commit.committed_at >= init_time {
            continue;
        }
        summary
            .attempts
            .push(notify_commit(ctx, source, notifier, commit)?);
    }
    Ok(summary)
}

fn notify_commit<S: CommitSource, N: Notifier>(
    ctx: &WatchContext,
    source: &S,
    notifier: &N,
    commit: &CommitInfo,
) -> Result<NotifyAttempt> {
    let diff = source.render_diff(commit)?;
    let page = match extract_page_name(&diff) {
        Some(page) => page,
        None => {
            ctx.logger.log("Error when finding file name.")?;
            FALLBACK_PAGE.to_string()
        }
    };

    let subject = build_subject(&ctx.config.smtp_subject, &page, &commit.author);
    let body = build_body(&ctx.config.wiki_url, &page, &diff);
    let status = match notifier.send(&subject, &body) {
        Ok(()) => {
            ctx.logger
                .log(&format!("Emails sent to: {}", ctx.config.smtp_to))?;
            SendStatus::Sent
        }
        Err(error) => {
            ctx.logger
                .log(&format!("ERROR - Unable to send notification: {error}"))?;
            SendStatus::Failed(error.to_string())
        }
    };

    Ok(NotifyAttempt {
        commit_id: commit.id.clone(),
        page,
        author: commit.author.clone(),
        status,
    })
}

fn build_subject(prefix: &str, page: &str, author: &str) -> String {
    format!("[{prefix} to {page}] by {author}")
}

fn build_body(wiki_url: &str, page: &str, diff: &str) -> String {
    let url = format!("{wiki_url}{page}");
    format!(
        "<html>\n\
         The modified file can be found <a href=\"{url}\">here.</a><br><br>\n\n\
         The following modifications were made:<br>\n\n\
         <pre>\n{diff}\n</pre>\n<br><br>\n\n\
         Your Friendly Wiki-Bot<br> <a href=\"{wiki_url}{FALLBACK_PAGE}\">Wiki Home</a><br><br>\n\n\
         </html>"
    )
}
