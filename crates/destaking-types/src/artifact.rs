//! Compiled contract artifacts.
//!
//! An artifact pairs a contract's ABI with its creation bytecode. Build tools
//! disagree on the JSON layout, so loading accepts:
//!
//! - Truffle and Hardhat: `{ "abi": [...], "bytecode": "0x..." }`
//! - Foundry: `{ "abi": [...], "bytecode": { "object": "0x..." } }`
//!
//! Artifacts are looked up by contract name below a build directory.

use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Bytes};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors raised while locating or parsing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
	#[error("Artifact for {name} not found under {dir}")]
	NotFound { name: String, dir: PathBuf },

	#[error("Failed to read artifact {path}: {source}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid artifact JSON in {0}: {1}")]
	Json(String, String),

	#[error("Artifact {0} has no ABI")]
	MissingAbi(String),

	#[error("Artifact {0} has no bytecode")]
	MissingBytecode(String),

	#[error("Artifact {0} has empty bytecode (interface or abstract contract)")]
	EmptyBytecode(String),

	#[error("Artifact {0} has unlinked library references")]
	UnlinkedLibraries(String),

	#[error("Invalid bytecode hex in {0}: {1}")]
	InvalidBytecode(String, String),
}

/// ABI and creation bytecode of one contract. The ABI is shared so contract
/// handles built from the artifact stay cheap to clone.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
	pub name: String,
	pub abi: Arc<JsonAbi>,
	pub bytecode: Bytes,
}

impl ContractArtifact {
	/// Build an artifact from already parsed JSON.
	pub fn from_json(name: &str, json: &Value) -> Result<Self, ArtifactError> {
		let abi_value = json
			.get("abi")
			.ok_or_else(|| ArtifactError::MissingAbi(name.to_string()))?;
		let abi: JsonAbi = serde_json::from_value(abi_value.clone())
			.map_err(|e| ArtifactError::Json(name.to_string(), e.to_string()))?;

		let bytecode_hex = match json.get("bytecode") {
			Some(Value::String(s)) => s.as_str(),
			Some(Value::Object(obj)) => obj
				.get("object")
				.and_then(Value::as_str)
				.ok_or_else(|| ArtifactError::MissingBytecode(name.to_string()))?,
			_ => return Err(ArtifactError::MissingBytecode(name.to_string())),
		};

		let bytecode = decode_bytecode(name, bytecode_hex)?;

		Ok(Self {
			name: name.to_string(),
			abi: Arc::new(abi),
			bytecode,
		})
	}

	/// Load an artifact from a JSON file. The contract name is taken from the
	/// `contractName` field when present, otherwise from the file stem.
	pub fn load(path: &Path) -> Result<Self, ArtifactError> {
		let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let json: Value = serde_json::from_str(&content)
			.map_err(|e| ArtifactError::Json(path.display().to_string(), e.to_string()))?;

		let name = json
			.get("contractName")
			.and_then(Value::as_str)
			.map(str::to_string)
			.or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
			.unwrap_or_default();

		Self::from_json(&name, &json)
	}

	/// Locate and load the artifact for `name` below `dir`.
	pub fn find(dir: &Path, name: &str) -> Result<Self, ArtifactError> {
		let path = locate(dir, name).ok_or_else(|| ArtifactError::NotFound {
			name: name.to_string(),
			dir: dir.to_path_buf(),
		})?;
		let mut artifact = Self::load(&path)?;
		artifact.name = name.to_string();
		Ok(artifact)
	}
}

/// Find the artifact file for `name`.
///
/// Checks `<dir>/<name>.json` and `<dir>/<name>.sol/<name>.json` first, then
/// walks the tree for a `<name>.sol/<name>.json` entry (Hardhat nests
/// artifacts under their source path).
pub fn locate(dir: &Path, name: &str) -> Option<PathBuf> {
	let file_name = format!("{name}.json");
	let candidates = [
		dir.join(&file_name),
		dir.join(format!("{name}.sol")).join(&file_name),
	];
	if let Some(path) = candidates.into_iter().find(|p| p.is_file()) {
		return Some(path);
	}
	walk_for(dir, &format!("{name}.sol"), &file_name)
}

fn walk_for(dir: &Path, sol_dir: &str, file_name: &str) -> Option<PathBuf> {
	let entries = std::fs::read_dir(dir).ok()?;
	for entry in entries.flatten() {
		let path = entry.path();
		if !path.is_dir() {
			continue;
		}
		if entry.file_name().to_str() == Some(sol_dir) {
			let candidate = path.join(file_name);
			if candidate.is_file() {
				return Some(candidate);
			}
		}
		if let Some(found) = walk_for(&path, sol_dir, file_name) {
			return Some(found);
		}
	}
	None
}

/// List contract names with artifacts directly in `dir` or in `*.sol`
/// subdirectories. Debug metadata (`*.dbg.json`) is skipped.
pub fn list(dir: &Path) -> Vec<String> {
	let mut names = Vec::new();
	collect_names(dir, &mut names);
	names.sort();
	names.dedup();
	names
}

fn collect_names(dir: &Path, names: &mut Vec<String>) {
	let Ok(entries) = std::fs::read_dir(dir) else {
		return;
	};
	for entry in entries.flatten() {
		let path = entry.path();
		if path.is_dir() {
			collect_names(&path, names);
			continue;
		}
		let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if file_name.ends_with(".dbg.json") {
			continue;
		}
		if let Some(stem) = file_name.strip_suffix(".json") {
			names.push(stem.to_string());
		}
	}
}

fn decode_bytecode(name: &str, raw: &str) -> Result<Bytes, ArtifactError> {
	let stripped = raw.trim().strip_prefix("0x").unwrap_or(raw.trim());
	if stripped.is_empty() {
		return Err(ArtifactError::EmptyBytecode(name.to_string()));
	}
	if stripped.contains("__") {
		return Err(ArtifactError::UnlinkedLibraries(name.to_string()));
	}
	hex::decode(stripped)
		.map(Bytes::from)
		.map_err(|e| ArtifactError::InvalidBytecode(name.to_string(), e.to_string()))
}
