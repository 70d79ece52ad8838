use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;

use bucket_cli::render::{format_controls, format_outcome, format_record, records_table};
use bucket_client::{ClientConfig, HttpGateway, RemoteArrayGateway};
use bucket_core::{
    CollectionBrowser, EditSession, LogReporter, ResultStore, WorkflowError, WorkflowOrchestrator,
};
use bucket_ingest::{AcquisitionMode, ArrayBuilder, GenerateParams, SubmitAction};
use bucket_model::{ArrayId, ArrayRecord};

use crate::cli::{Cli, EditArgs, SubmitArgs};

const NOT_FOUND_MESSAGE: &str = "No array with this ID was found.";

/// Everything a command needs to talk to the store.
pub struct Session {
    orchestrator: WorkflowOrchestrator,
    browser: CollectionBrowser,
}

impl Session {
    pub fn connect(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => ClientConfig::load(path)
                .with_context(|| format!("load client config {}", path.display()))?,
            None => ClientConfig::default(),
        };
        if let Some(url) = &cli.api_url {
            config = config.with_api_url(url.clone());
        }
        let gateway = HttpGateway::new(&config).context("create store client")?;
        tracing::debug!("Using array store at {}", gateway.base_url());

        let orchestrator = WorkflowOrchestrator::new(
            Arc::new(gateway),
            ResultStore::new(),
            Arc::new(LogReporter),
        );
        Ok(Self {
            orchestrator,
            browser: CollectionBrowser::new(),
        })
    }

    fn gateway(&self) -> &dyn RemoteArrayGateway {
        self.orchestrator.gateway()
    }

    /// Fetch one record; a missing id becomes a user-facing error.
    async fn fetch_record(&self, raw_id: &str) -> Result<ArrayRecord> {
        let id = parse_id(raw_id)?;
        match self.gateway().read(id).await {
            Ok(record) => Ok(record),
            Err(err) if err.is_not_found() => bail!(NOT_FOUND_MESSAGE),
            Err(err) => {
                let message = err.user_message().to_string();
                Err(anyhow::Error::new(err).context(message))
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<ArrayId> {
    raw.parse::<ArrayId>()
        .map_err(|_| anyhow!("'{raw}' is not a valid array id"))
}

/// Turn a workflow failure into an error carrying the user message.
fn workflow_failure(err: WorkflowError) -> anyhow::Error {
    let message = match err.persisted() {
        Some(id) => format!("{} Array {id} was saved but not sorted.", err.user_message()),
        None => err.user_message(),
    };
    anyhow::Error::new(err).context(message)
}

/// Fill a builder from the one source given on the command line.
async fn build_candidate(session: &Session, args: &SubmitArgs) -> Result<ArrayBuilder> {
    let source = &args.source;
    let mut builder = ArrayBuilder::new();

    if let Some(values) = &source.values {
        builder.select_mode(AcquisitionMode::Manual);
        for value in values {
            builder.push_entry(value)?;
        }
    } else if let Some(text) = &source.bulk {
        builder.select_mode(AcquisitionMode::BulkManual);
        builder.set_bulk_text(text)?;
    } else if let Some(count) = &source.generate {
        builder.select_mode(AcquisitionMode::Generated);
        builder.set_generate_params(GenerateParams::new(
            count.as_str(),
            args.min.as_str(),
            args.max.as_str(),
        ));
        builder.generate()?;
    } else if let Some(path) = &source.file {
        builder.select_mode(AcquisitionMode::Imported);
        builder.import_file(path)?;
    } else if let Some(raw_id) = &source.from_id {
        let record = session.fetch_record(raw_id).await?;
        builder.select_mode(AcquisitionMode::RemoteSelected);
        builder.select_record(&record)?;
    } else {
        bail!("no array source given");
    }

    tracing::debug!(mode = %builder.mode(), elements = builder.len(), "Candidate built");
    Ok(builder)
}

pub async fn run_submit(session: &Session, args: &SubmitArgs, action: SubmitAction) -> Result<()> {
    let mut builder = build_candidate(session, args).await?;
    let report = session
        .orchestrator
        .submit(&mut builder, action)
        .await
        .map_err(workflow_failure)?;

    if let Some(notice) = builder.notice() {
        println!("{}", notice.message());
    }
    if let Some(report) = report {
        println!("Array id: {}", report.id);
        println!("{}", format_outcome(&report.outcome));
    }
    Ok(())
}

pub async fn run_list(session: &mut Session, page: u32) -> Result<()> {
    if page == 0 {
        bail!("page numbers start at 1");
    }
    session.browser.set_page(page);
    let gateway = session.orchestrator.gateway();
    session.browser.refresh(gateway).await;

    if let Some(message) = session.browser.error() {
        bail!(message.to_string());
    }
    let Some(current) = session.browser.current() else {
        return Ok(());
    };
    if current.is_empty() {
        println!("No arrays stored.");
        return Ok(());
    }
    println!("{}", records_table(current, Utc::now()));
    if let Some(controls) = session.browser.controls() {
        println!("{}", format_controls(&controls));
    }
    Ok(())
}

pub async fn run_show(session: &mut Session, raw_id: &str) -> Result<()> {
    session.browser.set_search(Some(raw_id));
    let gateway = session.orchestrator.gateway();
    session.browser.refresh(gateway).await;

    if let Some(message) = session.browser.error() {
        bail!(message.to_string());
    }
    match session.browser.current().and_then(|page| page.items.first()) {
        Some(record) => println!("{}", format_record(record, Utc::now())),
        None => println!("{NOT_FOUND_MESSAGE}"),
    }
    Ok(())
}

pub async fn run_edit(session: &mut Session, args: &EditArgs) -> Result<()> {
    let record = session.fetch_record(&args.id).await?;
    let mut edit = EditSession::new();
    edit.open(record);
    let elements = edit.set_text(&args.data);
    tracing::debug!(elements, "Edit buffer replaced");

    if args.sort {
        let outcome = edit
            .sort(&session.orchestrator, &mut session.browser)
            .await
            .map_err(workflow_failure)?;
        println!("{}", bucket_core::UPDATED_AND_SORTED_MESSAGE);
        println!("{}", format_outcome(&outcome));
    } else {
        edit.save(&session.orchestrator, &mut session.browser)
            .await
            .map_err(workflow_failure)?;
        println!("{}", bucket_core::UPDATED_MESSAGE);
    }
    Ok(())
}

pub async fn run_delete(session: &mut Session, raw_id: &str) -> Result<()> {
    let record = session.fetch_record(raw_id).await?;
    let mut edit = EditSession::new();
    edit.open(record);
    edit.delete(&session.orchestrator, &mut session.browser)
        .await
        .map_err(workflow_failure)?;
    println!("{}", bucket_core::DELETED_MESSAGE);
    Ok(())
}
