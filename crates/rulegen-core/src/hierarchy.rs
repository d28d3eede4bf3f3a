//! Per-directory configuration, inherited down the tree.
//!
//! The registry owns one [`ConfigNode`] per visited directory. The root node
//! is created on first access and owns the manifest; every other node shares
//! it. Nodes are never removed during a run.

use crate::config::DIRECTIVE_PREFIX;
use crate::error::Error;
use crate::manifest::DependencyManifest;
use crate::paths;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Configuration for one directory.
#[derive(Debug, Clone)]
pub struct ConfigNode {
    rel: String,
    parent: Option<String>,
    manifest: Arc<DependencyManifest>,
    directives: BTreeMap<String, Vec<String>>,
    /// Keys set in this directory; inherited values for them are replaced.
    local_keys: HashSet<String>,
}

impl ConfigNode {
    fn root(manifest: DependencyManifest) -> Self {
        Self {
            rel: String::new(),
            parent: None,
            manifest: Arc::new(manifest),
            directives: BTreeMap::new(),
            local_keys: HashSet::new(),
        }
    }

    fn child(&self, rel: String) -> Self {
        Self {
            rel,
            parent: Some(self.rel.clone()),
            manifest: Arc::clone(&self.manifest),
            directives: self.directives.clone(),
            local_keys: HashSet::new(),
        }
    }

    /// Package path of this directory (`""` for the root).
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Package path of the node this one inherited from.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn manifest(&self) -> &DependencyManifest {
        &self.manifest
    }

    /// Shared handle to the manifest.
    #[must_use]
    pub fn manifest_handle(&self) -> Arc<DependencyManifest> {
        Arc::clone(&self.manifest)
    }

    /// Record a directive.
    ///
    /// The first value for `key` in this directory replaces whatever was
    /// inherited; later values append in order.
    pub fn add_directive(&mut self, key: &str, value: &str) {
        let values = self.directives.entry(key.to_string()).or_default();
        if self.local_keys.insert(key.to_string()) {
            values.clear();
        }
        values.push(value.to_string());
    }

    /// Values recorded for `key`, in declaration order.
    #[must_use]
    pub fn directive(&self, key: &str) -> &[String] {
        self.directives.get(key).map_or(&[], Vec::as_slice)
    }

    /// All directives visible in this directory, by key.
    #[must_use]
    pub fn directives(&self) -> &BTreeMap<String, Vec<String>> {
        &self.directives
    }
}

/// Memoized directory → configuration map for one run.
#[derive(Debug)]
pub struct ConfigRegistry {
    root: PathBuf,
    nodes: HashMap<String, ConfigNode>,
}

impl ConfigRegistry {
    /// Create a registry for the tree at `root`. The manifest is read lazily.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            nodes: HashMap::new(),
        }
    }

    /// Create a registry whose root node uses `manifest` instead of reading one.
    #[must_use]
    pub fn with_manifest(root: impl Into<PathBuf>, manifest: DependencyManifest) -> Self {
        let mut registry = Self::new(root);
        registry
            .nodes
            .insert(String::new(), ConfigNode::root(manifest));
        registry
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of directories configured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Already-created node for `rel`, if any.
    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&ConfigNode> {
        self.nodes.get(&paths::clean(rel))
    }

    /// Node for `rel`, creating it and any missing ancestors on first visit.
    ///
    /// Fails only when the root manifest has to be loaded and is malformed.
    pub fn resolve(&mut self, rel: &str) -> Result<&ConfigNode, Error> {
        let rel = self.materialize(rel)?;
        self.nodes
            .get(&rel)
            .ok_or_else(|| Error::internal(format!("config node for '{rel}' vanished")))
    }

    /// Resolve `rel` and record `directives` on it, in order.
    pub fn configure<I, K, V>(&mut self, rel: &str, directives: I) -> Result<&ConfigNode, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let rel = self.materialize(rel)?;
        let node = self
            .nodes
            .get_mut(&rel)
            .ok_or_else(|| Error::internal(format!("config node for '{rel}' vanished")))?;
        for (key, value) in directives {
            node.add_directive(key.as_ref(), value.as_ref());
        }
        Ok(&*node)
    }

    fn materialize(&mut self, rel: &str) -> Result<String, Error> {
        if !self.nodes.contains_key("") {
            let manifest = DependencyManifest::read(&self.root)?;
            self.nodes.insert(String::new(), ConfigNode::root(manifest));
        }

        let rel = paths::clean(rel);

        let mut missing = Vec::new();
        let mut cursor = rel.as_str();
        while !self.nodes.contains_key(cursor) {
            missing.push(cursor.to_string());
            cursor = paths::parent(cursor);
        }

        for child in missing.into_iter().rev() {
            let parent = paths::parent(&child);
            let node = match self.nodes.get(parent) {
                Some(p) => p.child(child.clone()),
                None => return Err(Error::internal(format!("no parent config for '{child}'"))),
            };
            debug!(package = %child, parent = %parent, "created config node");
            self.nodes.insert(child, node);
        }

        Ok(rel)
    }
}

/// Extract `# gazelle:<key> <value>` directives from a build file, in order.
///
/// A key without a value yields an empty value.
#[must_use]
pub fn parse_directives(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix(DIRECTIVE_PREFIX))
        .filter_map(|rest| {
            let rest = rest.trim();
            let (key, value) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}
