// src/codegen/mod.rs

//! Generate Rust record declarations for the tables of an archive.
//!
//! Every table becomes a struct with one field per column, implementing
//! [`Bindable`](crate::Bindable). An aggregate struct holds a `Vec` of every
//! table so the whole archive binds in one call.

mod names;

pub use names::{snake_case, upper_camel_case};

use std::{
    collections::{hash_map::Entry, HashMap},
    fmt::Write as _,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::archive::Archive;
use crate::error::GenerateError;
use crate::table::Table;

/// Render the module source for `archive`.
///
/// `module` names the module; the aggregate struct is called
/// `<Module>Archive`. A repeated table name is skipped after its first
/// occurrence, since only the first table of a name is ever bound. Names that
/// become the same Rust identifier fail with [`GenerateError::Collision`].
pub fn generate(archive: &Archive, module: &str) -> Result<String, GenerateError> {
    let tables = distinct_tables(archive);
    check_identifiers(&tables, module)?;

    let mut out = String::new();
    // writing into a String cannot fail
    let _ = render(&mut out, archive.comment(), &tables, module);
    Ok(out)
}

fn aggregate_ident(module: &str) -> String {
    format!("{}Archive", upper_camel_case(module))
}

fn distinct_tables(archive: &Archive) -> Vec<&Table> {
    let mut tables: Vec<&Table> = Vec::new();
    for table in archive.tables() {
        if tables.iter().any(|t| t.name() == table.name()) {
            warn!(table = %table.name(), "skipping repeated table; only the first one binds");
            continue;
        }
        tables.push(table);
    }
    tables
}

/// Identifiers already handed out within one Rust namespace.
struct Idents {
    scope: String,
    seen: HashMap<String, String>,
}

impl Idents {
    fn new(scope: String) -> Self {
        Self {
            scope,
            seen: HashMap::new(),
        }
    }

    fn claim(&mut self, ident: String, name: &str) -> Result<(), GenerateError> {
        match self.seen.entry(ident) {
            Entry::Occupied(e) => Err(GenerateError::Collision {
                scope: self.scope.clone(),
                ident: e.key().clone(),
                first: e.get().clone(),
                second: name.to_string(),
            }),
            Entry::Vacant(e) => {
                e.insert(name.to_string());
                Ok(())
            }
        }
    }
}

fn check_identifiers(tables: &[&Table], module: &str) -> Result<(), GenerateError> {
    let aggregate = aggregate_ident(module);
    let mut structs = Idents::new(format!("module {}", module));
    let mut lists = Idents::new(format!("struct {}", aggregate));

    for table in tables {
        structs.claim(upper_camel_case(table.name()), table.name())?;
        lists.claim(snake_case(table.name()), table.name())?;

        let mut fields = Idents::new(format!("table {}", table.name()));
        for col in table.columns() {
            fields.claim(snake_case(col.name()), col.name())?;
        }
    }
    structs.claim(aggregate.clone(), &aggregate)
}

fn render(out: &mut String, comment: &str, tables: &[&Table], module: &str) -> std::fmt::Result {
    writeln!(out, "// Code generated by scsv. DO NOT EDIT.")?;
    if !comment.is_empty() {
        writeln!(out, "//!")?;
        for line in comment.lines() {
            writeln!(out, "//! {}", line.trim_end())?;
        }
    }
    writeln!(out)?;
    writeln!(out, "use scsv::{{BindError, Bindable, Scope}};")?;

    for table in tables {
        writeln!(out)?;
        render_table(out, table)?;
    }

    let aggregate = aggregate_ident(module);
    writeln!(out)?;
    writeln!(out, "/// Every table of the archive.")?;
    writeln!(out, "#[derive(Debug, Clone, Default, PartialEq)]")?;
    writeln!(out, "pub struct {} {{", aggregate)?;
    for table in tables {
        writeln!(
            out,
            "    pub {}: Vec<{}>,",
            snake_case(table.name()),
            upper_camel_case(table.name())
        )?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl Bindable for {} {{", aggregate)?;
    writeln!(out, "    const TABLE: &'static str = {:?};", aggregate)?;
    writeln!(out)?;
    writeln!(out, "    fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {{")?;
    writeln!(out, "        Ok(Self {{")?;
    for table in tables {
        writeln!(out, "            {}: scope.list()?,", snake_case(table.name()))?;
    }
    writeln!(out, "        }})")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    Ok(())
}

fn render_table(out: &mut String, table: &Table) -> std::fmt::Result {
    let ident = upper_camel_case(table.name());

    writeln!(out, "/// A row of table `{}`.", table.name())?;
    writeln!(out, "#[derive(Debug, Clone, Default, PartialEq)]")?;
    writeln!(out, "pub struct {} {{", ident)?;
    for col in table.columns() {
        writeln!(
            out,
            "    pub {}: {},",
            snake_case(col.name()),
            col.ty().rust_type()
        )?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "impl Bindable for {} {{", ident)?;
    writeln!(out, "    const TABLE: &'static str = {:?};", table.name())?;
    writeln!(out)?;
    writeln!(out, "    fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {{")?;
    if table.columns().is_empty() {
        writeln!(out, "        let _ = scope;")?;
    }
    writeln!(out, "        Ok(Self {{")?;
    for col in table.columns() {
        writeln!(
            out,
            "            {}: scope.field({:?})?,",
            snake_case(col.name()),
            col.name()
        )?;
    }
    writeln!(out, "        }})")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")
}

/// Where generated source is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Module name, also the file stem.
    pub module: String,
    /// Directory the module file lands in.
    pub dir: PathBuf,
}

impl OutputLocation {
    /// Work out the module name and directory.
    ///
    /// Without `output` the module is named after the input file's stem and
    /// written to `./<stem>/`. With `output`, its last component names the
    /// module and the path itself is the directory; a path with no last
    /// component (`.`, `/`) keeps the input file's stem as module name.
    pub fn resolve(input: &Path, output: Option<&Path>) -> OutputLocation {
        match output {
            Some(dir) => {
                let dir: PathBuf = dir.components().collect();
                let module = dir
                    .file_name()
                    .or_else(|| input.file_stem())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                OutputLocation {
                    module: snake_case(&module),
                    dir,
                }
            }
            None => {
                let stem = input
                    .file_stem()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                OutputLocation {
                    dir: Path::new(".").join(&stem),
                    module: snake_case(&stem),
                }
            }
        }
    }

    /// `<dir>/<module>.rs`
    pub fn file(&self) -> PathBuf {
        self.dir.join(format!("{}.rs", self.module))
    }

    /// Write `source`, creating the directory if needed.
    ///
    /// The file is written to a temporary name first and renamed over the
    /// destination.
    pub fn write(&self, source: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.file();
        let tmp_path = self.dir.join(format!(".{}.rs.tmp", self.module));
        debug!(tmp = %tmp_path.display(), "writing generated source");

        let mut tmp = fs::File::create(&tmp_path)
            .map_err(|e| io::Error::new(e.kind(), format!("creating {:?}: {}", tmp_path, e)))?;
        tmp.write_all(source.as_bytes())?;
        drop(tmp);

        fs::rename(&tmp_path, &path).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("renaming {:?} -> {:?}: {}", tmp_path, path, e),
            )
        })?;

        info!(path = %path.display(), "wrote generated module");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const PEOPLE: &[u8] = b"Staff directory.\n\n-- People --\nName,Age(int),Score(float32)\nAlice,30,1.5\n-- Order Line --\nId(uint64),Type\n1,a\n";

    #[test]
    fn generates_struct_per_table() -> Result<()> {
        let archive = Archive::parse(PEOPLE)?;
        let src = generate(&archive, "people")?;

        assert!(src.starts_with("// Code generated by scsv. DO NOT EDIT.\n//!\n//! Staff directory.\n"));
        assert!(src.contains(
            "\
#[derive(Debug, Clone, Default, PartialEq)]
pub struct People {
    pub name: String,
    pub age: i64,
    pub score: f32,
}

impl Bindable for People {
    const TABLE: &'static str = \"People\";

    fn bind(scope: &Scope<'_>) -> Result<Self, BindError> {
        Ok(Self {
            name: scope.field(\"Name\")?,
            age: scope.field(\"Age\")?,
            score: scope.field(\"Score\")?,
        })
    }
}
"
        ));
        assert!(src.contains("pub struct OrderLine {\n    pub id: u64,\n    pub r#type: String,\n}"));
        assert!(src.contains("const TABLE: &'static str = \"Order Line\";"));
        Ok(())
    }

    #[test]
    fn generates_aggregate() -> Result<()> {
        let archive = Archive::parse(PEOPLE)?;
        let src = generate(&archive, "people")?;

        assert!(src.contains(
            "\
pub struct PeopleArchive {
    pub people: Vec<People>,
    pub order_line: Vec<OrderLine>,
}"
        ));
        assert!(src.contains("            people: scope.list()?,\n            order_line: scope.list()?,\n"));
        Ok(())
    }

    #[test]
    fn repeated_table_is_generated_once() -> Result<()> {
        let archive = Archive::parse(b"-- T --\nA\nx\n-- T --\nA\ny\n-- U --\nB\nz\n")?;
        let src = generate(&archive, "m")?;

        assert_eq!(src.matches("pub struct T {").count(), 1);
        assert_eq!(src.matches("impl Bindable for T {").count(), 1);
        assert!(src.contains("pub struct MArchive {\n    pub t: Vec<T>,\n    pub u: Vec<U>,\n}"));
        Ok(())
    }

    #[test]
    fn table_names_sharing_a_struct_name_fail() -> Result<()> {
        let archive = Archive::parse(b"-- Order Line --\nX\n1\n-- OrderLine --\nX\n2\n")?;
        assert_eq!(
            generate(&archive, "m").unwrap_err(),
            GenerateError::Collision {
                scope: "module m".into(),
                ident: "OrderLine".into(),
                first: "Order Line".into(),
                second: "OrderLine".into(),
            }
        );
        Ok(())
    }

    #[test]
    fn column_names_sharing_a_field_name_fail() -> Result<()> {
        let archive = Archive::parse(b"-- T --\nFirstName,First Name\na,b\n")?;
        let err = generate(&archive, "m").unwrap_err();
        assert_eq!(
            err,
            GenerateError::Collision {
                scope: "table T".into(),
                ident: "first_name".into(),
                first: "FirstName".into(),
                second: "First Name".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "\"FirstName\" and \"First Name\" in table T both become the identifier first_name"
        );
        Ok(())
    }

    #[test]
    fn table_named_like_the_aggregate_fails() -> Result<()> {
        let archive = Archive::parse(b"-- MArchive --\nX\n1\n")?;
        assert!(matches!(
            generate(&archive, "m").unwrap_err(),
            GenerateError::Collision { ref ident, .. } if ident == "MArchive"
        ));
        Ok(())
    }

    #[test]
    fn output_defaults_to_input_stem() {
        let loc = OutputLocation::resolve(Path::new("testdata/people.scsv"), None);
        assert_eq!(loc.module, "people");
        assert_eq!(loc.dir, Path::new("./people"));
        assert_eq!(loc.file(), Path::new("./people/people.rs"));
    }

    #[test]
    fn output_dir_names_the_module() {
        let loc = OutputLocation::resolve(Path::new("x.scsv"), Some(Path::new("gen/records/")));
        assert_eq!(loc.module, "records");
        assert_eq!(loc.dir, Path::new("gen/records"));
        assert_eq!(loc.file(), Path::new("gen/records/records.rs"));
    }

    #[test]
    fn output_dir_without_last_component_keeps_input_stem() {
        let loc = OutputLocation::resolve(Path::new("testdata/people.scsv"), Some(Path::new(".")));
        assert_eq!(loc.module, "people");
        assert_eq!(loc.file(), Path::new("./people.rs"));

        let loc = OutputLocation::resolve(Path::new("testdata/people.scsv"), Some(Path::new("/")));
        assert_eq!(loc.module, "people");
        assert_eq!(loc.file(), Path::new("/people.rs"));
    }

    #[test]
    fn write_creates_directory() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let loc = OutputLocation {
            module: "people".into(),
            dir: tmp.path().join("nested").join("people"),
        };
        let path = loc.write("// hi\n")?;
        assert_eq!(path, loc.file());
        assert_eq!(fs::read_to_string(&path)?, "// hi\n");
        assert!(!loc.dir.join(".people.rs.tmp").exists());
        Ok(())
    }
}
