//! Session provisioning.
//!
//! In scenario mode the server pre-registers one user per seat and writes
//! their session tokens into a run directory under its storage root:
//!
//! ```text
//! game-data-scenarios/
//!   2024-05-01T10-00-00/
//!     test-tokens.json   {"playerWest": "...", "playerEast": "...", "playerSouth": "..."}
//! ```
//!
//! The most recently modified run directory is the current one. Tokens are
//! read through a [`TokenSource`] so the executor never touches the
//! filesystem itself, and every seat gets its own client bound to its own
//! token.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use prefhub_client::{ClientFactory, Session, SessionToken};
use prefhub_core::PlayerSeat;

use crate::config::DEFAULT_TOKEN_FILE;
use crate::error::ProvisionError;

/// Session token per seat.
pub type TokenMap = BTreeMap<PlayerSeat, SessionToken>;

/// Bound client per seat.
pub type ClientMap<C> = BTreeMap<PlayerSeat, C>;

/// Supplies the session tokens for a run.
pub trait TokenSource {
    /// Load the token for every seat the source knows about.
    fn load_tokens(&self) -> Result<TokenMap, ProvisionError>;
}

impl TokenSource for TokenMap {
    fn load_tokens(&self) -> Result<TokenMap, ProvisionError> {
        Ok(self.clone())
    }
}

/// Tokens from the newest run directory under a storage root.
#[derive(Debug, Clone)]
pub struct StorageDirTokenSource {
    root: PathBuf,
    file_name: String,
}

impl StorageDirTokenSource {
    /// Source reading `test-tokens.json` from the newest run under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: DEFAULT_TOKEN_FILE.to_string(),
        }
    }

    /// Read a differently named token file.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Storage root being searched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TokenSource for StorageDirTokenSource {
    fn load_tokens(&self) -> Result<TokenMap, ProvisionError> {
        let run = discover_token_artifact(&self.root)?;
        tracing::info!(run = %run.display(), "Using scenario storage");
        load_tokens(&run, &self.file_name)
    }
}

/// Tokens from an already chosen run directory.
#[derive(Debug, Clone)]
pub struct TokenArtifact {
    /// Run directory holding the token file.
    pub dir: PathBuf,
    /// Token file name inside `dir`.
    pub file_name: String,
}

impl TokenArtifact {
    /// Artifact reading `test-tokens.json` from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: DEFAULT_TOKEN_FILE.to_string(),
        }
    }
}

impl TokenSource for TokenArtifact {
    fn load_tokens(&self) -> Result<TokenMap, ProvisionError> {
        load_tokens(&self.dir, &self.file_name)
    }
}

/// Find the most recently modified run directory under `root`.
pub fn discover_token_artifact(root: &Path) -> Result<PathBuf, ProvisionError> {
    let not_found = || ProvisionError::NoScenarioStorageFound {
        root: root.to_path_buf(),
    };
    if !root.is_dir() {
        return Err(not_found());
    }

    let io_err = |source| ProvisionError::Io {
        path: root.to_path_buf(),
        source,
    };
    let mut candidates = Vec::new();
    for entry in fs::read_dir(root).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let metadata = entry.metadata().map_err(io_err)?;
        if !metadata.is_dir() {
            continue;
        }
        let modified = metadata.modified().map_err(io_err)?;
        candidates.push((entry.path(), modified));
    }

    select_most_recent(candidates).ok_or_else(not_found)
}

/// Pick the newest candidate. Equal timestamps go to the larger path, so
/// timestamped run names still order correctly on coarse clocks.
pub fn select_most_recent(
    candidates: impl IntoIterator<Item = (PathBuf, SystemTime)>,
) -> Option<PathBuf> {
    candidates
        .into_iter()
        .max_by(|(a_path, a_time), (b_path, b_time)| {
            a_time.cmp(b_time).then_with(|| a_path.cmp(b_path))
        })
        .map(|(path, _)| path)
}

/// Read `file_name` in `dir`: a JSON object of seat key to token.
///
/// Keys that are not seats are skipped.
pub fn load_tokens(dir: &Path, file_name: &str) -> Result<TokenMap, ProvisionError> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(ProvisionError::TokenFileMissing { path });
    }
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(source) => return Err(ProvisionError::Io { path, source }),
    };
    let raw: BTreeMap<String, String> = match serde_json::from_str(&contents) {
        Ok(raw) => raw,
        Err(source) => return Err(ProvisionError::Parse { path, source }),
    };

    let mut tokens = TokenMap::new();
    for (key, token) in raw {
        match key.parse::<PlayerSeat>() {
            Ok(seat) => {
                tokens.insert(seat, SessionToken::new(token));
            }
            Err(_) => tracing::debug!(key = %key, "Ignoring token for unknown seat"),
        }
    }
    tracing::debug!(path = %path.display(), seats = tokens.len(), "Loaded session tokens");
    Ok(tokens)
}

/// Bind one client per seat.
///
/// Every seat must have a token; nothing is connected otherwise.
pub fn provision_clients<F: ClientFactory>(
    tokens: &TokenMap,
    factory: &F,
) -> Result<ClientMap<F::Client>, ProvisionError> {
    if let Some(seat) = PlayerSeat::ALL
        .into_iter()
        .find(|seat| !tokens.contains_key(seat))
    {
        return Err(ProvisionError::MissingPlayerToken(seat));
    }

    let mut clients = ClientMap::new();
    for (seat, token) in tokens {
        let session = Session::new(token.clone(), seat.key());
        let client = factory
            .connect(session)
            .map_err(|source| ProvisionError::Client {
                seat: *seat,
                source,
            })?;
        tracing::info!(seat = %seat, token = token.preview(), "Session ready");
        clients.insert(*seat, client);
    }
    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefhub_client::GameApi;
    use prefhub_test_utils::fixtures::{token_for, TokenStorage};
    use prefhub_test_utils::recording::RecordingFactory;
    use std::time::Duration;

    #[test]
    fn test_select_most_recent_by_mtime() {
        let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let picked = select_most_recent([
            (PathBuf::from("b"), base),
            (PathBuf::from("a"), base + Duration::from_secs(5)),
            (PathBuf::from("c"), base + Duration::from_secs(1)),
        ]);
        assert_eq!(picked, Some(PathBuf::from("a")));
    }

    #[test]
    fn test_select_most_recent_tie_goes_to_larger_name() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(42);
        let picked = select_most_recent([
            (PathBuf::from("run-2024-01-02"), t),
            (PathBuf::from("run-2024-01-03"), t),
            (PathBuf::from("run-2024-01-01"), t),
        ]);
        assert_eq!(picked, Some(PathBuf::from("run-2024-01-03")));
    }

    #[test]
    fn test_select_most_recent_empty() {
        assert_eq!(select_most_recent(Vec::new()), None);
    }

    #[test]
    fn test_storage_source_reads_tokens() {
        let storage = TokenStorage::new();
        storage.add_full_run("run-1");
        let tokens = StorageDirTokenSource::new(storage.root())
            .load_tokens()
            .unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[&PlayerSeat::East].as_str(),
            token_for(PlayerSeat::East)
        );
    }

    #[test]
    fn test_empty_storage_root() {
        let storage = TokenStorage::new();
        let err = StorageDirTokenSource::new(storage.root())
            .load_tokens()
            .unwrap_err();
        assert!(matches!(err, ProvisionError::NoScenarioStorageFound { .. }));
    }

    #[test]
    fn test_missing_storage_root() {
        let err = discover_token_artifact(Path::new("/nonexistent/game-data-scenarios")).unwrap_err();
        assert!(matches!(err, ProvisionError::NoScenarioStorageFound { .. }));
    }

    #[test]
    fn test_run_without_token_file() {
        let storage = TokenStorage::new();
        storage.add_empty_run("run-1");
        let err = StorageDirTokenSource::new(storage.root())
            .load_tokens()
            .unwrap_err();
        assert!(matches!(err, ProvisionError::TokenFileMissing { .. }));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_TOKEN_FILE),
            r#"{"playerSouth":"s","playerNorth":"n"}"#,
        )
        .unwrap();
        let tokens = TokenArtifact::new(dir.path()).load_tokens().unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains_key(&PlayerSeat::South));
    }

    #[test]
    fn test_malformed_token_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tokens.json"), "not json").unwrap();
        let err = load_tokens(dir.path(), "tokens.json").unwrap_err();
        assert!(matches!(err, ProvisionError::Parse { .. }));
    }

    #[test]
    fn test_provision_binds_each_seat() {
        let tokens: TokenMap = PlayerSeat::ALL
            .into_iter()
            .map(|seat| (seat, SessionToken::new(token_for(seat))))
            .collect();
        let factory = RecordingFactory::new();
        let clients = provision_clients(&tokens, &factory).unwrap();

        assert_eq!(clients.len(), 3);
        for (seat, client) in &clients {
            assert_eq!(client.username(), seat.key());
        }
        assert_eq!(factory.connected().len(), 3);
    }

    #[test]
    fn test_provision_missing_seat_connects_nothing() {
        let mut tokens = TokenMap::new();
        tokens.insert(PlayerSeat::West, SessionToken::new("w"));
        tokens.insert(PlayerSeat::South, SessionToken::new("s"));
        let factory = RecordingFactory::new();

        let err = provision_clients(&tokens, &factory).unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::MissingPlayerToken(PlayerSeat::East)
        ));
        assert!(factory.connected().is_empty());
    }
}
