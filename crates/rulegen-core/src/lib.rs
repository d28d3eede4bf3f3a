#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Static import-graph analysis and build target generation for
//! TypeScript/JavaScript trees.

pub mod classify;
pub mod config;
pub mod error;
pub mod generate;
pub mod hierarchy;
pub mod imports;
pub mod infer;
pub mod kind;
pub mod manifest;
pub mod paths;
pub mod render;
pub mod resolve;
pub mod version;

pub use classify::{classify_files, RolePattern, SourceFileRecord};
pub use config::{Config, Labels, BUILD_FILES, MANIFEST_FILE};
pub use error::{codes, Error, ErrorScope};
pub use generate::{GenerateArgs, GenerateResult, Generator, Target};
pub use hierarchy::{parse_directives, ConfigNode, ConfigRegistry};
pub use imports::{ImportKind, ImportScanner, ImportSpec, LineScanner};
pub use infer::infer_rule_kind;
pub use kind::{LanguageTier, RuleKind};
pub use manifest::DependencyManifest;
pub use render::render_build_file;
pub use resolve::{DepRef, Resolver};
pub use version::{VersionInfo, SCHEMA_VERSION, VERSION};
