//! Messaging Gateway drawing on the terminal.

use crate::input::LastChoices;
use async_trait::async_trait;
use colored::Colorize;
use poiedit_core::error::Result;
use poiedit_core::gateway::{
    Button, ChoiceSet, MessageBody, MessageHandle, MessagingGateway, OutgoingMessage,
};
use poiedit_core::view::{SummaryValue, SummaryView};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct ConsoleGateway {
    next: AtomicI64,
    last: Mutex<LastChoices>,
    photos_dir: PathBuf,
}

impl ConsoleGateway {
    pub fn new(photos_dir: PathBuf) -> Self {
        Self {
            next: AtomicI64::new(1),
            last: Mutex::new(LastChoices::default()),
            photos_dir,
        }
    }

    pub fn last_choices(&self) -> LastChoices {
        self.last.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn remember(&self, handle: MessageHandle, choices: &ChoiceSet) {
        if choices.is_empty() {
            return;
        }
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        *last = LastChoices {
            handle: Some(handle),
            choices: choices.clone(),
        };
    }
}

fn print_summary(view: &SummaryView) {
    println!("{}", view.title.bold());
    for row in &view.rows {
        let value = match &row.value {
            SummaryValue::Location { text, url, .. } => format!("{} ({})", text, url),
            SummaryValue::Links { links } => links
                .iter()
                .map(|l| format!("{} {}", l.label, l.url))
                .collect::<Vec<_>>()
                .join(", "),
            SummaryValue::Unknown { placeholder } => placeholder.bright_black().to_string(),
            other => other.plain(),
        };
        let command = row
            .command
            .as_deref()
            .map(|c| format!(" /{}", c).bright_black().to_string())
            .unwrap_or_default();
        println!("  {}: {}{}", row.label.cyan(), value, command);
    }
    if let Some(comment) = &view.comment {
        println!("{}", comment.italic());
    }
}

fn print_choices(choices: &ChoiceSet) {
    let mut n = 0;
    for row in &choices.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|button| {
                n += 1;
                match button {
                    Button::Action { label, .. } => format!("#{} {}", n, label),
                    Button::Url { label, url } => format!("{} <{}>", label, url),
                }
            })
            .collect();
        println!("  {}", cells.join("   ").bright_yellow());
    }
}

#[async_trait]
impl MessagingGateway for ConsoleGateway {
    async fn send(&self, _user: &str, message: OutgoingMessage) -> Result<MessageHandle> {
        let handle = MessageHandle(self.next.fetch_add(1, Ordering::SeqCst));
        match &message.body {
            MessageBody::Text { text } => {
                for line in text.lines() {
                    println!("{}", line.bright_blue());
                }
            }
            MessageBody::Summary { view } => print_summary(view),
            MessageBody::Photo { name, caption } => {
                let path = self.photos_dir.join(format!("{}.jpg", name));
                println!("{} {}", format!("[photo {}]", path.display()).magenta(), caption);
            }
        }
        print_choices(&message.choices);
        self.remember(handle, &message.choices);
        Ok(handle)
    }

    async fn send_album(&self, _user: &str, photos: &[String]) -> Result<Vec<MessageHandle>> {
        let mut handles = Vec::with_capacity(photos.len());
        for (i, name) in photos.iter().enumerate() {
            let path = self.photos_dir.join(format!("{}.jpg", name));
            println!("{}", format!("[{}] {}", i + 1, path.display()).magenta());
            handles.push(MessageHandle(self.next.fetch_add(1, Ordering::SeqCst)));
        }
        Ok(handles)
    }

    async fn edit_choices(
        &self,
        _user: &str,
        handle: MessageHandle,
        choices: ChoiceSet,
    ) -> Result<()> {
        println!("{}", "(options updated)".bright_black());
        print_choices(&choices);
        self.remember(handle, &choices);
        Ok(())
    }

    async fn retract(&self, _user: &str, handles: &[MessageHandle]) -> Result<()> {
        tracing::debug!("Withdrawn messages {:?}", handles);
        Ok(())
    }

    async fn notice(&self, _user: &str, text: &str) -> Result<()> {
        println!("{}", format!("! {}", text).yellow());
        Ok(())
    }

    async fn fetch_upload(&self, upload_id: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(upload_id).await?)
    }
}
