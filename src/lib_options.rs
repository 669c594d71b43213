use hashbrown::HashSet;

/// Shared libraries probed by the generated loader, in load order
pub const DEFAULT_LIBRARIES: [&str; 13] = [
    "allegro",
    "allegro_acodec",
    "allegro_audio",
    "allegro_primitives",
    "allegro_color",
    "allegro_font",
    "allegro_ttf",
    "allegro_image",
    "allegro_dialog",
    "allegro_memfile",
    "allegro_physfs",
    "allegro_shader",
    "allegro_main",
];

/// Naming conventions of the wrapped library and knobs of the generated
/// module
#[derive(Clone, Debug)]
pub struct LibraryProfile {
    pub type_prefix: String,                  // named types must start with this
    pub function_prefix: String,              // callable symbols must start with this
    pub excluded_define_prefixes: Vec<String>, // `#define`s skipped by prefix
    pub excluded_names: HashSet<String>,      // declarations skipped by exact name
    pub libraries: Vec<String>,               // shared library base names
    pub release: String,                      // release tag appended to library names
    pub version: String,                      // version tag used on Windows
    pub footer: bool,                         // emit the library-specific helpers
}

impl LibraryProfile {
    /// Whether a named type or constant line should be registered.
    pub fn accepts_type_name(&self, name: &str) -> bool {
        (name.is_empty() || name.starts_with(&self.type_prefix)) && !self.excluded_names.contains(name)
    }

    pub fn accepts_define(&self, name: &str) -> bool {
        !self
            .excluded_define_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

impl Default for LibraryProfile {
    fn default() -> Self {
        LibraryProfile {
            type_prefix: "ALLEGRO_".to_string(),
            function_prefix: "al_".to_string(),
            excluded_define_prefixes: vec!["_".to_string(), "GL_".to_string()],
            excluded_names: HashSet::from_iter(["ALLEGRO_OGL_EXT_API".to_string()]),
            libraries: DEFAULT_LIBRARIES.iter().map(|s| s.to_string()).collect(),
            release: String::new(),
            version: String::new(),
            footer: true,
        }
    }
}
