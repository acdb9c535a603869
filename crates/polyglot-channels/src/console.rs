//! Console host: a game chat simulated on stdin/stdout.
//!
//! Input lines:
//! - `name: text`: `name` says `text` (connecting on first use)
//! - `-name`: `name` disconnects
//!
//! Output lines are `[@name] text` for private messages and `[all] text`
//! for public ones.
//!
//! The reader applies one line at a time: it does not read the next line
//! until the consumer acknowledges the previous event, so the player list
//! never runs ahead of the chat being handled.

use async_trait::async_trait;
use chrono::Utc;
use polyglot_core::{
    error::PolyglotError,
    message::{Client, ClientId, HostEvent, ReplyMode},
    traits::Host,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{mpsc, Notify};
use tracing::{debug, info, warn};

type Input = Box<dyn AsyncRead + Send + Unpin>;
type Output = Box<dyn Write + Send>;

/// Host reading chat from a line-oriented input.
pub struct ConsoleHost {
    prefixes: Vec<char>,
    clients: Arc<Mutex<Vec<Client>>>,
    /// Signalled by `acknowledge`; the reader waits on it after each event.
    handled: Arc<Notify>,
    input: Mutex<Option<Input>>,
    output: Mutex<Output>,
}

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Say { name: &'a str, text: &'a str },
    Leave { name: &'a str },
}

fn parse_line(line: &str) -> Option<Line<'_>> {
    let line = line.trim();
    if let Some(name) = line.strip_prefix('-') {
        let name = name.trim();
        return (!name.is_empty()).then_some(Line::Leave { name });
    }
    let (name, text) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some(Line::Say {
        name,
        text: text.trim_start(),
    })
}

impl ConsoleHost {
    /// Console host on stdin/stdout.
    pub fn new(prefixes: Vec<char>) -> Self {
        Self {
            prefixes,
            clients: Arc::new(Mutex::new(Vec::new())),
            handled: Arc::new(Notify::new()),
            input: Mutex::new(None),
            output: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    /// Read chat from `input` instead of stdin.
    pub fn with_input(mut self, input: impl AsyncRead + Send + Unpin + 'static) -> Self {
        self.input = Mutex::new(Some(Box::new(input)));
        self
    }

    /// Write deliveries to `output` instead of stdout.
    pub fn with_output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Mutex::new(Box::new(output));
        self
    }

    fn write_line(&self, line: &str) -> Result<(), PolyglotError> {
        let mut out = self
            .output
            .lock()
            .map_err(|_| PolyglotError::Host("console output lock poisoned".to_string()))?;
        writeln!(out, "{line}")?;
        out.flush()?;
        Ok(())
    }
}

/// Translate one input line into a host event, tracking connected clients.
fn to_event(clients: &Mutex<Vec<Client>>, line: Line<'_>) -> Option<HostEvent> {
    let mut clients = clients.lock().ok()?;
    match line {
        Line::Say { name, text } => {
            let client = match clients.iter().find(|c| c.name == name) {
                Some(c) => c.clone(),
                None => {
                    let client = Client::new(name, name);
                    info!("console: {name} connected");
                    clients.push(client.clone());
                    client
                }
            };
            Some(HostEvent::Say {
                client,
                text: text.to_string(),
                team: false,
                at: Utc::now(),
            })
        }
        Line::Leave { name } => {
            let index = clients.iter().position(|c| c.name == name)?;
            let client = clients.remove(index);
            info!("console: {name} disconnected");
            Some(HostEvent::Disconnect { client: client.id })
        }
    }
}

#[async_trait]
impl Host for ConsoleHost {
    fn name(&self) -> &str {
        "console"
    }

    async fn start(&self) -> Result<mpsc::Receiver<HostEvent>, PolyglotError> {
        let input: Input = self
            .input
            .lock()
            .map_err(|_| PolyglotError::Host("console input lock poisoned".to_string()))?
            .take()
            .unwrap_or_else(|| Box::new(tokio::io::stdin()));

        let (tx, rx) = mpsc::channel(64);
        let clients = self.clients.clone();
        let handled = self.handled.clone();

        info!("Console host reading chat lines...");

        tokio::spawn(async move {
            let mut lines = BufReader::new(input).lines();
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("console: input closed");
                        break;
                    }
                    Err(e) => {
                        warn!("console: failed to read input: {e}");
                        break;
                    }
                };

                let Some(parsed) = parse_line(&line) else {
                    if !line.trim().is_empty() {
                        warn!("console: ignoring malformed line: {line}");
                    }
                    continue;
                };

                if let Some(event) = to_event(&clients, parsed) {
                    if tx.send(event).await.is_err() {
                        info!("console: receiver dropped, stopping reader");
                        break;
                    }
                    handled.notified().await;
                }
            }
        });

        Ok(rx)
    }

    async fn clients(&self) -> Vec<Client> {
        self.clients.lock().map(|c| c.clone()).unwrap_or_default()
    }

    async fn message(&self, client: &ClientId, text: &str) -> Result<(), PolyglotError> {
        self.write_line(&format!("[@{client}] {text}"))
    }

    async fn respond(
        &self,
        client: &ClientId,
        text: &str,
        mode: ReplyMode,
    ) -> Result<(), PolyglotError> {
        match mode {
            ReplyMode::Private => self.message(client, text).await,
            ReplyMode::Loud => self.write_line(&format!("[all] {text}")),
            ReplyMode::Big => self.write_line(&format!("[all!] {text}")),
        }
    }

    fn command_prefixes(&self) -> &[char] {
        &self.prefixes
    }

    async fn acknowledge(&self) {
        self.handled.notify_one();
    }
}
