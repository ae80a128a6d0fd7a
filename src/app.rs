use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};

use crate::{
    api::{self, HttpKnowledgeBase},
    cli::{Cli, Command},
    domain::{
        self,
        events::ServerHealth,
        shell_state::{CLEAR_FAILURE_TEXT, CLEAR_SUCCESS_TEXT},
    },
    infra::{self, error::AppError},
    ui,
    usecases::{
        self,
        ask::{ask, AskCommand, AskError, ChatBackend},
        bootstrap,
        clear_knowledge_base::{
            clear_knowledge_base, confirm_and_clear, ClearOutcome, ConfirmPrompt,
            KnowledgeBaseCleaner, StdConfirmPrompt,
        },
        context::AppContext,
        health::{check_health, HealthProbe},
        ingest_text::{ingest_text, prepare_ingest, TextIngestor},
        upload_files::{display_name, upload_file, DocumentUploader},
    },
};

const CLEAR_DECLINED_TEXT: &str = "Clear cancelled.";

pub fn run(cli: Cli) -> Result<ExitCode> {
    let context = bootstrap::bootstrap(cli.config.as_deref(), cli.base_url.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let succeeded = match cli.command_or_default() {
        Command::Run => {
            let mut shell = bootstrap::compose_shell(&context)?;
            ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            )?;
            true
        }
        Command::Ask { message } => {
            run_ask(&connect(&context)?, &message.join(" "), &mut io::stdout().lock())?
        }
        Command::Upload { paths } => {
            run_upload(&connect(&context)?, &paths, &mut io::stdout().lock())?
        }
        Command::Ingest { file, text } => {
            let raw = ingest_source(file.as_deref(), text)?;
            run_ingest(&connect(&context)?, &raw, &mut io::stdout().lock())?
        }
        Command::Clear { yes } => {
            let gateway = connect(&context)?;
            let mut prompt = StdConfirmPrompt;
            let prompt: Option<&mut dyn ConfirmPrompt> = if yes { None } else { Some(&mut prompt) };
            run_clear(&gateway, prompt, &mut io::stdout().lock())?
        }
        Command::Health => run_health(&connect(&context)?, &mut io::stdout().lock())?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn connect(context: &AppContext) -> Result<HttpKnowledgeBase, AppError> {
    HttpKnowledgeBase::new(&context.config.server)
}

/// Prints the answer with its sources, or the fallback text. Returns
/// whether a real answer came back.
fn run_ask(backend: &dyn ChatBackend, message: &str, out: &mut dyn Write) -> Result<bool> {
    let reply = match ask(
        backend,
        AskCommand {
            message: message.to_owned(),
        },
    ) {
        Ok(reply) => reply,
        Err(AskError::EmptyMessage) => bail!("message must not be empty"),
    };

    let answered = reply.is_answer();
    let printed = reply.into_message();
    writeln!(out, "{}", printed.text)?;
    if let Some(sources) = printed.sources_line() {
        writeln!(out, "{sources}")?;
    }

    Ok(answered)
}

/// Uploads each path in order and prints one status line per file.
fn run_upload(uploader: &dyn DocumentUploader, paths: &[PathBuf], out: &mut dyn Write) -> Result<bool> {
    let mut all_succeeded = true;

    for path in paths {
        let name = display_name(path);
        match upload_file(uploader, path) {
            Ok(receipt) => writeln!(out, "{name}: success{}", receipt.details(&name))?,
            Err(error) => {
                tracing::warn!(path = %path.display(), error = ?error, "file upload failed");
                all_succeeded = false;
                writeln!(out, "{name}: error")?;
            }
        }
    }

    Ok(all_succeeded)
}

fn ingest_source(file: Option<&Path>, text: Option<String>) -> Result<String> {
    match (file, text) {
        (Some(path), _) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        (None, Some(text)) => Ok(text),
        (None, None) => bail!("provide TEXT or --file PATH"),
    }
}

fn run_ingest(ingestor: &dyn TextIngestor, raw: &str, out: &mut dyn Write) -> Result<bool> {
    let Some(prepared) = prepare_ingest(raw, chrono::Local::now()) else {
        bail!("nothing to ingest: text is empty");
    };

    match ingest_text(ingestor, &prepared) {
        Ok(receipt) => {
            writeln!(
                out,
                "{}: success{}",
                prepared.display_name,
                receipt.details(&prepared.display_name)
            )?;
            Ok(true)
        }
        Err(_) => {
            writeln!(out, "{}: error", prepared.display_name)?;
            Ok(false)
        }
    }
}

/// Clears the knowledge base, asking `prompt` first when one is given.
fn run_clear(
    cleaner: &dyn KnowledgeBaseCleaner,
    prompt: Option<&mut dyn ConfirmPrompt>,
    out: &mut dyn Write,
) -> Result<bool> {
    let outcome = match prompt {
        Some(prompt) => confirm_and_clear(prompt, cleaner)?,
        None => clear_knowledge_base(cleaner).map(|()| ClearOutcome::Cleared),
    };

    let (text, succeeded) = match outcome {
        Ok(ClearOutcome::Cleared) => (CLEAR_SUCCESS_TEXT, true),
        Ok(ClearOutcome::Declined) => (CLEAR_DECLINED_TEXT, true),
        Err(_) => (CLEAR_FAILURE_TEXT, false),
    };
    writeln!(out, "{text}")?;

    Ok(succeeded)
}

fn run_health(probe: &dyn HealthProbe, out: &mut dyn Write) -> Result<bool> {
    let health = check_health(probe);
    writeln!(out, "server: {}", health.as_label())?;

    Ok(health == ServerHealth::Healthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::chat_message::CONNECTION_FAILURE_TEXT, test_support::StubGateway,
    };

    struct ScriptedPrompt(bool);

    impl ConfirmPrompt for ScriptedPrompt {
        fn confirm(&mut self, _question: &str) -> io::Result<bool> {
            Ok(self.0)
        }
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn ask_prints_answer_and_sources() {
        let gateway = StubGateway::answering("Two days a week.", &["doc1", "doc2"]);
        let mut out = Vec::new();

        let answered = run_ask(&gateway, "What is the policy?", &mut out).expect("ask");

        assert!(answered);
        assert_eq!(output(out), "Two days a week.\nSources: doc1 doc2\n");
    }

    #[test]
    fn ask_prints_fallback_and_reports_failure() {
        let gateway = StubGateway::unreachable();
        let mut out = Vec::new();

        let answered = run_ask(&gateway, "hello", &mut out).expect("ask");

        assert!(!answered);
        assert_eq!(output(out), format!("{CONNECTION_FAILURE_TEXT}\n"));
    }

    #[test]
    fn ask_rejects_blank_message() {
        let gateway = StubGateway::answering("unused", &[]);

        assert!(run_ask(&gateway, "   ", &mut Vec::new()).is_err());
    }

    #[test]
    fn upload_reports_each_file_in_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let present = dir.path().join("notes.txt");
        fs::File::create(&present)
            .and_then(|mut file| file.write_all(b"hello"))
            .expect("fixture");
        let missing = dir.path().join("missing.pdf");

        let gateway = StubGateway::answering("unused", &[]);
        let mut out = Vec::new();

        let all_succeeded =
            run_upload(&gateway, &[present, missing], &mut out).expect("upload");

        assert!(!all_succeeded);
        assert_eq!(output(out), "notes.txt: success (1 chunks)\nmissing.pdf: error\n");
        assert_eq!(gateway.uploaded_names(), vec!["notes.txt"]);
    }

    #[test]
    fn ingest_prints_stored_name_and_chunk_count() {
        let gateway = StubGateway::answering("unused", &[]);
        let mut out = Vec::new();

        assert!(run_ingest(&gateway, "Office closes at 6pm.", &mut out).expect("ingest"));

        let printed = output(out);
        assert!(printed.starts_with("Input @ "));
        assert!(printed.contains(": success (stored as manual_input_"));
        assert!(printed.ends_with(".txt, 1 chunks)\n"));
    }

    #[test]
    fn ingest_refuses_blank_text() {
        let gateway = StubGateway::answering("unused", &[]);

        assert!(run_ingest(&gateway, " \n\t ", &mut Vec::new()).is_err());
    }

    #[test]
    fn ingest_source_prefers_file_contents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("input.txt");
        fs::write(&path, "from file").expect("fixture");

        assert_eq!(
            ingest_source(Some(&path), None).expect("source"),
            "from file"
        );
        assert_eq!(
            ingest_source(None, Some("inline".to_owned())).expect("source"),
            "inline"
        );
        assert!(ingest_source(None, None).is_err());
    }

    #[test]
    fn declined_clear_makes_no_change() {
        let gateway = StubGateway::unreachable();
        let mut prompt = ScriptedPrompt(false);
        let mut out = Vec::new();

        let succeeded = run_clear(&gateway, Some(&mut prompt), &mut out).expect("clear");

        assert!(succeeded);
        assert_eq!(output(out), format!("{CLEAR_DECLINED_TEXT}\n"));
    }

    #[test]
    fn unconfirmed_clear_reports_backend_failure() {
        let gateway = StubGateway::unreachable();
        let mut out = Vec::new();

        let succeeded = run_clear(&gateway, None, &mut out).expect("clear");

        assert!(!succeeded);
        assert_eq!(output(out), format!("{CLEAR_FAILURE_TEXT}\n"));
    }

    #[test]
    fn confirmed_clear_prints_success() {
        let gateway = StubGateway::answering("unused", &[]);
        let mut prompt = ScriptedPrompt(true);
        let mut out = Vec::new();

        assert!(run_clear(&gateway, Some(&mut prompt), &mut out).expect("clear"));
        assert_eq!(output(out), format!("{CLEAR_SUCCESS_TEXT}\n"));
    }

    #[test]
    fn health_prints_label() {
        let mut out = Vec::new();

        assert!(run_health(&StubGateway::answering("", &[]), &mut out).expect("health"));
        assert!(!run_health(&StubGateway::unreachable(), &mut Vec::new()).expect("health"));
        assert_eq!(output(out), "server: healthy\n");
    }
}
