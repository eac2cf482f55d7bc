//! YAML description of a reply, used by the binary.
//!
//! ```yaml
//! interaction: { id: 81234, token: "tok" }
//! content: "pong"
//! ephemeral: true
//! files:
//!   - path: ./report.txt
//!     spoiler: true
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use cmdreply_core::error::{ReplyError, Result};
use cmdreply_core::{AttachmentData, AttachmentOption, Embed, MentionType};

use crate::dispatch::{ReplyAction, ReplyDispatcher};
use crate::interaction::Interaction;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyFile {
    pub interaction: InteractionRef,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub ephemeral: bool,
    #[serde(default)]
    pub embeds: Vec<Embed>,
    #[serde(default)]
    pub files: Vec<FileRef>,
    /// Omitted = default categories.
    #[serde(default)]
    pub allowed_mentions: Option<Vec<MentionType>>,
    #[serde(default)]
    pub mention_users: Vec<String>,
    #[serde(default)]
    pub mention_roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRef {
    pub path: PathBuf,
    /// Display name; defaults to the path's file name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spoiler: bool,
}

impl FileRef {
    fn display_name(&self) -> Result<String> {
        if let Some(n) = &self.name {
            return Ok(n.clone());
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ReplyError::InvalidParameter(format!("no file name in {}", self.path.display()))
            })
    }
}

impl FromStr for ReplyFile {
    type Err = ReplyError;

    fn from_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| ReplyError::Config(format!("invalid reply yaml: {e}")))
    }
}

impl ReplyFile {
    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| ReplyError::Config(format!("read reply file failed: {e}")))?;
        s.parse()
    }

    /// Build the action. Attachment files are opened here and streamed on submit.
    pub fn into_action(self, dispatcher: &ReplyDispatcher) -> Result<ReplyAction> {
        let interaction = Interaction::new(self.interaction.id, self.interaction.token);
        let mut action = dispatcher
            .reply(interaction)
            .tts(self.tts)
            .ephemeral(self.ephemeral)
            .allowed_mentions(self.allowed_mentions)
            .add_embeds(self.embeds)?
            .mention_users(&self.mention_users)?
            .mention_roles(&self.mention_roles)?;

        if let Some(content) = self.content {
            action = action.content(content);
        }

        for f in &self.files {
            let name = f.display_name()?;
            let file = File::open(&f.path).map_err(|e| {
                ReplyError::InvalidParameter(format!("open {} failed: {e}", f.path.display()))
            })?;
            let options: &[AttachmentOption] = if f.spoiler { &[AttachmentOption::Spoiler] } else { &[] };
            action = action.add_file(AttachmentData::from_reader(file), &name, options)?;
        }
        Ok(action)
    }
}
