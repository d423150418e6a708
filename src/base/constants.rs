//! Domain constants for the analyzed language.

/// File name of the module manifest.
pub const MANIFEST_FILE: &str = "go.mod";

/// Manifest directive declaring the module path.
pub const MODULE_DIRECTIVE: &str = "module";

/// Manifest directive declaring the language version.
pub const VERSION_DIRECTIVE: &str = "go";

/// The blank identifier. Declarations with this name are never indexed.
pub const BLANK_IDENTIFIER: &str = "_";

/// Separator between the import path and the local path of a symbol ID.
pub const ID_PACKAGE_SEPARATOR: &str = "::";

/// Separator between the local path and the kind tag of a symbol ID.
pub const ID_KIND_SEPARATOR: char = '#';

/// Separator introducing the ordinal of a duplicated symbol ID.
pub const ID_ORDINAL_SEPARATOR: char = '~';
