//! Loading of compiled contract artifacts.
//!
//! Both the Hardhat layout (`<dir>/contracts/<Name>.sol/<Name>.json`, with a hex string
//! under `bytecode`) and the Foundry layout (`<dir>/<Name>.sol/<Name>.json`, with the hex
//! string under `bytecode.object`) are supported.

use std::{collections::HashMap, fs, path::PathBuf, str::FromStr};

use alloy_primitives::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::{
    constants::{
        ARTIFACT_EXTENSION, BYTECODE_KEY, BYTECODE_OBJECT_KEY, HARDHAT_SOURCES_DIR,
        SOLIDITY_EXTENSION,
    },
    errors::ScriptError,
    types::MarketplaceContract,
};

/// The creation bytecode of each marketplace contract
pub type ContractBytecodes = HashMap<MarketplaceContract, Bytes>;

/// A directory of compiled contract artifacts
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts directory
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the artifact file for the given contract
    pub fn artifact_path(&self, contract: MarketplaceContract) -> Result<PathBuf, ScriptError> {
        let name = contract.artifact_name();
        let source_dir = format!("{name}.{SOLIDITY_EXTENSION}");
        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");

        let candidates = [
            self.root.join(HARDHAT_SOURCES_DIR).join(&source_dir).join(&file_name),
            self.root.join(&source_dir).join(&file_name),
        ];

        candidates.into_iter().find(|p| p.is_file()).ok_or_else(|| {
            ScriptError::ArtifactParsing(format!(
                "no artifact for `{}` under {}",
                name,
                self.root.display()
            ))
        })
    }

    /// Read the creation bytecode of the given contract
    pub fn bytecode(&self, contract: MarketplaceContract) -> Result<Bytes, ScriptError> {
        let path = self.artifact_path(contract)?;
        debug!("reading {} artifact from {}", contract, path.display());

        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        let artifact: Value = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

        parse_bytecode(&artifact)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))
    }

    /// Read the creation bytecode of every marketplace contract
    pub fn load_all(&self) -> Result<ContractBytecodes, ScriptError> {
        MarketplaceContract::ALL
            .into_iter()
            .map(|contract| self.bytecode(contract).map(|code| (contract, code)))
            .collect()
    }
}

/// Extract the creation bytecode from a parsed artifact
fn parse_bytecode(artifact: &Value) -> Result<Bytes, String> {
    let hex = match &artifact[BYTECODE_KEY] {
        Value::String(hex) => hex.as_str(),
        Value::Object(obj) => obj
            .get(BYTECODE_OBJECT_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("missing `{BYTECODE_KEY}.{BYTECODE_OBJECT_KEY}`"))?,
        _ => return Err(format!("missing `{BYTECODE_KEY}`")),
    };

    let bytecode = Bytes::from_str(hex).map_err(|e| format!("invalid bytecode hex: {e}"))?;
    if bytecode.is_empty() {
        return Err("empty bytecode, is the contract abstract?".to_string());
    }

    Ok(bytecode)
}
