//! Demo pages: game settings read from disk, and a balance page derived from
//! them.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use pageflow_page::{Context, Page, PageKind, PageRef, ProduceError, Producer, TypedPage};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettingsPage {
  pub max_players: u32,
  pub music_volume: f32,
}

impl Default for GameSettingsPage {
  fn default() -> Self {
    Self {
      max_players: 4,
      music_volume: 0.75,
    }
  }
}

impl Page for GameSettingsPage {
  fn kind(&self) -> PageKind {
    Self::KIND
  }
}

impl TypedPage for GameSettingsPage {
  const KIND: PageKind = PageKind::new("GameSettings");
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteBalancePage {
  pub enemy_hp_multiplier: f32,
}

impl RemoteBalancePage {
  /// Each player beyond the first adds 30% enemy health.
  pub fn from_settings(settings: &GameSettingsPage) -> Self {
    let extra_players = settings.max_players.saturating_sub(1) as f32;
    Self {
      enemy_hp_multiplier: 1.0 + extra_players * 0.3,
    }
  }
}

impl Page for RemoteBalancePage {
  fn kind(&self) -> PageKind {
    Self::KIND
  }
}

impl TypedPage for RemoteBalancePage {
  const KIND: PageKind = PageKind::new("RemoteBalance");
}

/// Reads [`GameSettingsPage`] from a JSON file. A missing file yields the
/// defaults.
pub struct GameSettingsProducer {
  path: PathBuf,
}

impl GameSettingsProducer {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  fn decode(&self, content: io::Result<String>) -> Result<PageRef, ProduceError> {
    let settings = match content {
      Ok(content) => serde_json::from_str(&content).map_err(ProduceError::failed)?,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "settings file not found, using defaults");
        GameSettingsPage::default()
      }
      Err(e) => return Err(ProduceError::failed(e)),
    };
    Ok(Arc::new(settings))
  }
}

#[async_trait]
impl Producer for GameSettingsProducer {
  fn kind(&self) -> PageKind {
    GameSettingsPage::KIND
  }

  fn dependencies(&self) -> &[PageKind] {
    &[]
  }

  fn produce(&self, _context: &Context) -> Result<PageRef, ProduceError> {
    self.decode(std::fs::read_to_string(&self.path))
  }

  async fn produce_async(
    &self,
    _context: &Context,
    cancel: &CancellationToken,
  ) -> Result<PageRef, ProduceError> {
    if cancel.is_cancelled() {
      return Err(ProduceError::Cancelled);
    }
    self.decode(tokio::fs::read_to_string(&self.path).await)
  }
}

/// Derives [`RemoteBalancePage`] from the game settings.
pub struct RemoteBalanceProducer {
  dependencies: Vec<PageKind>,
}

impl RemoteBalanceProducer {
  pub fn new() -> Self {
    Self {
      dependencies: vec![GameSettingsPage::KIND],
    }
  }
}

impl Default for RemoteBalanceProducer {
  fn default() -> Self {
    Self::new()
  }
}

impl Producer for RemoteBalanceProducer {
  fn kind(&self) -> PageKind {
    RemoteBalancePage::KIND
  }

  fn dependencies(&self) -> &[PageKind] {
    &self.dependencies
  }

  fn produce(&self, context: &Context) -> Result<PageRef, ProduceError> {
    let settings = context.require::<GameSettingsPage>()?;
    Ok(Arc::new(RemoteBalancePage::from_settings(settings)))
  }
}
