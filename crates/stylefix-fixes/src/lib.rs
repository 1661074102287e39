//! stylefix-fixes: fix strategy registry and implementations
//!
//! The public surface the surrounding tooling drives:
//! - `FixRegistry::resolve()`: violations + configuration -> strategies
//! - `apply_fixes()`: strategies + trees -> fixed trees + summary
//!
//! Strategies (Header, UpperEll, HexLiteralCase, RedundantImport) live
//! in `fixes`; check identity in `check`.

pub mod check;
pub mod fixes;
pub mod logging;
pub mod registry;
pub mod summary;

pub use check::{CheckKind, ConfigModule};
pub use fixes::{Fix, HeaderFix, HexLiteralCaseFix, RedundantImportFix, UpperEllFix, ViolationSet};
pub use registry::FixRegistry;
pub use summary::{apply_fixes, AppliedFix, FixSummary};
