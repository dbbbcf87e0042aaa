#![allow(dead_code)]

use pub2pdf::domain::model::{BatchReport, BindingKind, ConversionOutcome, ExportConstants};
use pub2pdf::domain::ports::{ProgressReporter, PublisherApp, PublisherDocument, PublisherLauncher};
use pub2pdf::{ConvertError, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Everything the fake Publisher saw, shared between the launcher handed to
/// the engine and the test that inspects it afterwards.
#[derive(Debug, Default)]
pub struct Recorded {
    pub launches: usize,
    pub quits: usize,
    pub visible: Option<bool>,
    pub opened: Vec<PathBuf>,
    pub closed: usize,
    pub exported: Vec<(PathBuf, ExportConstants)>,
}

#[derive(Debug, Clone)]
struct Script {
    fail_launch: bool,
    fail_quit: bool,
    fail_hide: bool,
    binding: BindingKind,
    constants: ExportConstants,
    /// File names (not paths) whose export raises.
    export_errors: HashSet<String>,
    /// File names whose export panics inside the backend.
    export_panics: HashSet<String>,
    /// File names for which Publisher claims to have opened something else.
    wrong_documents: HashSet<String>,
    /// File names for which `Open` returns nothing.
    empty_opens: HashSet<String>,
}

#[derive(Clone)]
pub struct FakeLauncher {
    script: Rc<Script>,
    recorded: Rc<RefCell<Recorded>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self {
            script: Rc::new(Script {
                fail_launch: false,
                fail_quit: false,
                fail_hide: false,
                binding: BindingKind::TypeLibrary,
                constants: ExportConstants { format: 2, intent: 3 },
                export_errors: HashSet::new(),
                export_panics: HashSet::new(),
                wrong_documents: HashSet::new(),
                empty_opens: HashSet::new(),
            }),
            recorded: Rc::new(RefCell::new(Recorded::default())),
        }
    }

    fn edit(mut self, f: impl FnOnce(&mut Script)) -> Self {
        f(Rc::make_mut(&mut self.script));
        self
    }

    pub fn failing_launch(self) -> Self {
        self.edit(|s| s.fail_launch = true)
    }

    pub fn failing_quit(self) -> Self {
        self.edit(|s| s.fail_quit = true)
    }

    pub fn failing_hide(self) -> Self {
        self.edit(|s| s.fail_hide = true)
    }

    pub fn dynamic_binding(self) -> Self {
        self.edit(|s| {
            s.binding = BindingKind::Dynamic;
            s.constants = ExportConstants::FALLBACK;
        })
    }

    pub fn failing_export_for(self, file_name: &str) -> Self {
        let name = file_name.to_string();
        self.edit(|s| {
            s.export_errors.insert(name);
        })
    }

    pub fn panicking_export_for(self, file_name: &str) -> Self {
        let name = file_name.to_string();
        self.edit(|s| {
            s.export_panics.insert(name);
        })
    }

    pub fn opening_wrong_document_for(self, file_name: &str) -> Self {
        let name = file_name.to_string();
        self.edit(|s| {
            s.wrong_documents.insert(name);
        })
    }

    pub fn opening_nothing_for(self, file_name: &str) -> Self {
        let name = file_name.to_string();
        self.edit(|s| {
            s.empty_opens.insert(name);
        })
    }

    pub fn recorded(&self) -> Rc<RefCell<Recorded>> {
        Rc::clone(&self.recorded)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl PublisherLauncher for FakeLauncher {
    type App = FakeApp;

    fn launch(&self) -> Result<FakeApp> {
        self.recorded.borrow_mut().launches += 1;
        if self.script.fail_launch {
            return Err(ConvertError::automation("launch", "class not registered"));
        }
        Ok(FakeApp {
            script: Rc::clone(&self.script),
            recorded: Rc::clone(&self.recorded),
        })
    }
}

pub struct FakeApp {
    script: Rc<Script>,
    recorded: Rc<RefCell<Recorded>>,
}

impl PublisherApp for FakeApp {
    type Document = FakeDocument;

    fn binding(&self) -> BindingKind {
        self.script.binding
    }

    fn export_constants(&self) -> ExportConstants {
        self.script.constants
    }

    fn set_visible(&self, visible: bool) -> Result<()> {
        if self.script.fail_hide {
            return Err(ConvertError::automation("hide window", "member not found"));
        }
        self.recorded.borrow_mut().visible = Some(visible);
        Ok(())
    }

    fn open(&self, path: &Path) -> Result<Option<FakeDocument>> {
        self.recorded.borrow_mut().opened.push(path.to_path_buf());
        let name = file_name(path);
        if self.script.empty_opens.contains(&name) {
            return Ok(None);
        }
        let reported = if self.script.wrong_documents.contains(&name) {
            path.with_file_name("someone-else.pub")
        } else {
            path.to_path_buf()
        };
        Ok(Some(FakeDocument {
            source: path.to_path_buf(),
            reported,
            script: Rc::clone(&self.script),
            recorded: Rc::clone(&self.recorded),
        }))
    }

    fn quit(self) -> Result<()> {
        self.recorded.borrow_mut().quits += 1;
        if self.script.fail_quit {
            return Err(ConvertError::automation("quit", "RPC server unavailable"));
        }
        Ok(())
    }
}

pub struct FakeDocument {
    source: PathBuf,
    reported: PathBuf,
    script: Rc<Script>,
    recorded: Rc<RefCell<Recorded>>,
}

impl PublisherDocument for FakeDocument {
    fn full_name(&self) -> Result<String> {
        Ok(self.reported.display().to_string())
    }

    fn export_as_fixed_format(&self, constants: ExportConstants, destination: &Path) -> Result<()> {
        if self.script.export_panics.contains(&file_name(&self.source)) {
            panic!("Publisher crashed while exporting {}", self.source.display());
        }
        if self.script.export_errors.contains(&file_name(&self.source)) {
            return Err(ConvertError::automation("export", "The printer is not available"));
        }
        std::fs::write(destination, format!("%PDF-fake {}", self.source.display()))?;
        self.recorded
            .borrow_mut()
            .exported
            .push((destination.to_path_buf(), constants));
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.recorded.borrow_mut().closed += 1;
        Ok(())
    }
}

/// Progress reporter that keeps the per-file results it was told about.
#[derive(Clone, Default)]
pub struct RecordingProgress {
    pub results: Rc<RefCell<Vec<(PathBuf, bool)>>>,
    pub finished: Rc<RefCell<Option<(usize, usize)>>>,
}

impl ProgressReporter for RecordingProgress {
    fn file_finished(&self, _index: usize, _total: usize, source: &Path, outcome: &ConversionOutcome) {
        self.results
            .borrow_mut()
            .push((source.to_path_buf(), outcome.is_success()));
    }

    fn batch_finished(&self, report: &BatchReport) {
        *self.finished.borrow_mut() = Some((report.converted, report.failed));
    }
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"publisher document").unwrap();
}
