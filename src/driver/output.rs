//! Output formatting module
//!
//! Renders a finished symbol table either as a Python ctypes binding module
//! or as a plain-text table dump for inspection.

use hashbrown::HashSet;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::lib_options::LibraryProfile;
use crate::semantic::SymbolTable;
use crate::types::{CType, Field, FunctionSig, Record, RecordKind, TypeEntry};

const MODULE_HEADER: &str = r#"# Generated by ffigen.
import os, platform, sys
from ctypes import *
from ctypes.util import *

# You must adjust this function to point ctypes to the DLLs you are
# distributing.
_dlls = []
def _add_dll(name):
    release = "@RELEASE@"
    if os.name == "nt":
        release = "@RELEASE@-@VERSION@"

    # Under Windows, DLLs are found in the current directory, so this
    # would be an easy way to keep all your DLLs in a sub-folder.

    # os.chdir("dlls")

    path = find_library(name + release)
    if not path:
        if os.name == "mac":
            path = name + release + ".dylib"
        elif os.name == "nt":
            path = name + release + ".dll"
        elif os.name == "posix":
            if platform.mac_ver()[0]:
                path = name + release + ".dylib"
            else:
                path = "lib" + name + release + ".so"
        else:
            sys.stderr.write("Cannot find library " + name + "\n")

    try:
        # RTLD_GLOBAL is required under OSX
        _dlls.append(CDLL(path, RTLD_GLOBAL))
    except OSError:
        # No need to fail here, might just be one of the addons.
        pass

   # os.chdir("..")

"#;

const LOOKUP_SHIM: &str = r#"
# Which library exports which function is not known, so try them all.
def _dll(func, ret, params):
    for dll in _dlls:
        try:
            f = dll[func]
            f.restype = ret
            f.argtypes = params
            return f
        except AttributeError: pass
    sys.stderr.write("Cannot find function " + func + "\n")
    return lambda *args: None

# Python 3 strings are unicode, so they have to be converted to UTF-8
# byte strings before being passed on.
if sys.version_info[0] > 2:
    class _AL_UTF8String:
        def from_param(x):
            return x.encode("utf8")
else:
    _AL_UTF8String = c_char_p

"#;

const LIBRARY_FOOTER: &str = r#"
ALLEGRO_VERSION_INT = \
    ((ALLEGRO_VERSION << 24) | (ALLEGRO_SUB_VERSION << 16) | \
    (ALLEGRO_WIP_VERSION << 8) | ALLEGRO_RELEASE_NUMBER)

# work around bug http://gcc.gnu.org/bugzilla/show_bug.cgi?id=36834
if os.name == "nt":
    def al_map_rgba_f(r, g, b, a): return ALLEGRO_COLOR(r, g, b, a)
    def al_map_rgb_f(r, g, b): return ALLEGRO_COLOR(r, g, b, 1)
    def al_map_rgba(r, g, b, a): return ALLEGRO_COLOR(r / 255.0, g / 255.0, b / 255.0, a / 255.0)
    def al_map_rgb(r, g, b): return ALLEGRO_COLOR(r / 255.0, g / 255.0, b / 255.0, 1)

def al_main(real_main, *args):
    def python_callback(argc, argv):
        real_main(*args)
        return 0
    cb = CFUNCTYPE(c_int, c_int, c_void_p)(python_callback)
    al_run_main(0, 0, cb);
"#;

fn records_of<'t>(
    types: &'t [(&'t String, &'t TypeEntry)],
    kind: RecordKind,
) -> impl Iterator<Item = (&'t String, &'t Record)> {
    types.iter().filter_map(move |&(name, entry)| match entry {
        TypeEntry::Record(record) if record.kind == kind => Some((name, record)),
        _ => None,
    })
}

type FieldLists<'t> = IndexMap<&'t str, (&'t String, &'t [Field])>;

/// Records with a body, structs before unions and each group by name, except
/// that a record always follows every record it holds by value. ctypes
/// finalizes a class once it is used as a field type, so an embedded
/// record's `_fields_` must be assigned first.
fn field_list_order<'t>(types: &'t [(&'t String, &'t TypeEntry)]) -> Vec<(&'t String, &'t [Field])> {
    let mut bodies = FieldLists::new();
    for kind in [RecordKind::Struct, RecordKind::Union] {
        for (name, record) in records_of(types, kind) {
            if let Some(fields) = &record.fields {
                bodies.insert(name.as_str(), (name, fields.as_slice()));
            }
        }
    }

    let mut placed = HashSet::new();
    let mut order = Vec::with_capacity(bodies.len());
    for &name in bodies.keys() {
        place_field_list(name, &bodies, &mut placed, &mut order);
    }
    order
}

fn place_field_list<'t>(
    name: &'t str,
    bodies: &FieldLists<'t>,
    placed: &mut HashSet<&'t str>,
    order: &mut Vec<(&'t String, &'t [Field])>,
) {
    let Some(&(full_name, fields)) = bodies.get(name) else {
        return;
    };
    if !placed.insert(name) {
        return;
    }
    for field in fields {
        if let Some(inner) = field.ty.embedded_record() {
            place_field_list(inner, bodies, placed, order);
        }
    }
    order.push((full_name, fields));
}

/// Handler for the output formats
pub struct OutputHandler;

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputHandler {
    pub fn new() -> Self {
        OutputHandler
    }

    /// Render the complete binding module.
    pub fn render_module(&self, table: &SymbolTable, profile: &LibraryProfile) -> String {
        let mut out = MODULE_HEADER
            .replace("@RELEASE@", &profile.release)
            .replace("@VERSION@", &profile.version);
        for library in &profile.libraries {
            out.push_str(&format!("_add_dll(\"{}\")\n", library));
        }
        out.push_str(LOOKUP_SHIM);
        out.push_str(&self.render_bindings(table));
        if profile.footer {
            out.push_str(LIBRARY_FOOTER);
        }
        out
    }

    /// Everything derived from the symbol table, in sorted-by-name order:
    /// constants, record classes, aliases, field lists, functions. Field
    /// lists additionally follow the records they embed.
    pub fn render_bindings(&self, table: &SymbolTable) -> String {
        let mut out = String::new();

        for (name, value) in table.constants().iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            out.push_str(&format!("{} = {}\n", name, value));
        }

        let types = table.types().iter().sorted_by(|a, b| a.0.cmp(b.0)).collect_vec();

        for kind in [RecordKind::Struct, RecordKind::Union] {
            for (name, _) in records_of(&types, kind) {
                out.push_str(&format!("class {}({}): pass\n", name, kind.base_class()));
                out.push_str(&format!("{} = POINTER({})\n", CType::pointer_to(CType::Record(name.clone())), name));
            }
        }

        for (name, entry) in &types {
            if let TypeEntry::Alias(ty) = entry {
                out.push_str(&format!("{} = {}\n", name, ty));
            }
        }

        for (name, fields) in field_list_order(&types) {
            out.push_str(&format!("{}._fields_ = [\n", name));
            for field in fields {
                out.push_str(&format!("    (\"{}\", {}),\n", field.name, field.ty));
            }
            out.push_str("    ]\n");
        }

        for (_, sig) in table.functions().iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            out.push_str(&self.render_function(sig));
        }
        out
    }

    fn render_function(&self, sig: &FunctionSig) -> String {
        let ret = sig.ret.as_ref().map_or_else(|| "None".to_string(), CType::to_string);
        format!(
            "{} = _dll(\"{}\", {}, [{}])\n",
            sig.name,
            sig.name,
            ret,
            sig.params.iter().join(", ")
        )
    }

    /// Plain-text dump of the table in insertion order.
    pub fn dump_symbol_table(&self, table: &SymbolTable) -> String {
        let mut out = String::new();
        out.push_str("=== Constants ===\n");
        for (name, value) in table.constants() {
            out.push_str(&format!("{} = {}\n", name, value));
        }
        out.push_str("=== Types ===\n");
        for (name, entry) in table.types() {
            match entry {
                TypeEntry::Alias(ty) => out.push_str(&format!("{}: alias {}\n", name, ty)),
                TypeEntry::Record(record) => {
                    let kind = match record.kind {
                        RecordKind::Struct => "struct",
                        RecordKind::Union => "union",
                    };
                    match &record.fields {
                        None => out.push_str(&format!("{}: {} (opaque)\n", name, kind)),
                        Some(fields) => {
                            out.push_str(&format!("{}: {}\n", name, kind));
                            for field in fields {
                                out.push_str(&format!("  {}: {}\n", field.name, field.ty));
                            }
                        }
                    }
                }
            }
        }
        out.push_str("=== Functions ===\n");
        for sig in table.functions().values() {
            let ret = sig.ret.as_ref().map_or_else(|| "void".to_string(), CType::to_string);
            out.push_str(&format!("{}({}) -> {}\n", sig.name, sig.params.iter().join(", "), ret));
        }
        out
    }
}
