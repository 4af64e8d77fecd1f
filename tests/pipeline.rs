//! Full-site generation: hook ordering, partial failure, cancellation and
//! staleness, driven through the public API.

mod common;

use common::TestSite;
use sitewright::context::SiteContext;
use sitewright::generate::{CancelToken, GenerationError, Outcome};
use sitewright::plugin::{AfterOrder, HookError, HookStage, Plugin, PluginChain};
use sitewright::plugins::DIGEST_ATTRIBUTE;
use sitewright::resource::Resource;
use sitewright::site::Site;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Wraps content in `<name>` … `</name>` and logs every hook call.
struct Wrapper {
    name: &'static str,
    order: AfterOrder,
    log: Arc<Mutex<Vec<String>>>,
}

impl Wrapper {
    fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name,
            order: AfterOrder::Reverse,
            log: Arc::clone(log),
        }
    }
}

impl Plugin for Wrapper {
    fn name(&self) -> &'static str {
        self.name
    }

    fn before_generation(&self, _: &Resource, content: &mut Vec<u8>) -> Result<(), HookError> {
        self.log.lock().unwrap().push(format!("{}:before", self.name));
        let mut wrapped = format!("<{}>", self.name).into_bytes();
        wrapped.append(content);
        *content = wrapped;
        Ok(())
    }

    fn after_generation(&self, _: &Resource, content: &mut Vec<u8>) -> Result<(), HookError> {
        self.log.lock().unwrap().push(format!("{}:after", self.name));
        content.extend_from_slice(format!("</{}>", self.name).as_bytes());
        Ok(())
    }

    fn after_order(&self) -> AfterOrder {
        self.order
    }
}

/// Fails `after_generation` for resources whose name contains `bad`.
struct Picky;

impl Plugin for Picky {
    fn name(&self) -> &'static str {
        "picky"
    }

    fn after_generation(&self, resource: &Resource, _: &mut Vec<u8>) -> Result<(), HookError> {
        if resource.relative_path().to_string_lossy().contains("bad") {
            return Err(HookError::Failed("rejected".into()));
        }
        Ok(())
    }
}

/// Appends a footer after generation.
struct Banner;

impl Plugin for Banner {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn after_generation(&self, _: &Resource, content: &mut Vec<u8>) -> Result<(), HookError> {
        content.extend_from_slice(b"<footer>banner</footer>");
        Ok(())
    }
}

/// Moves `*.txt` output under `text/`.
struct Relocate;

impl Plugin for Relocate {
    fn name(&self) -> &'static str {
        "relocate"
    }

    fn on_resolve(&self, resource: &mut Resource) {
        if resource.extension() == "txt" {
            let moved = Path::new("text").join(resource.relative_path());
            resource.set_deploy_path(moved);
        }
    }
}

fn site_with(dir: &TestSite, plugins: Vec<Arc<dyn Plugin>>) -> Site {
    let context = Arc::new(SiteContext::load(dir.root()).unwrap());
    Site::with_chain(context, Arc::new(PluginChain::new(plugins))).unwrap()
}

#[test]
fn hooks_nest_around_content() {
    let dir = TestSite::new();
    dir.write("a.txt", "x");
    let log = Arc::new(Mutex::new(Vec::new()));
    let site = site_with(
        &dir,
        vec![
            Arc::new(Wrapper::new("outer", &log)),
            Arc::new(Wrapper::new("inner", &log)),
        ],
    );

    site.generator()
        .generate_resource_at(Path::new("a.txt"))
        .unwrap();

    assert_eq!(
        fs::read_to_string(dir.deploy("a.txt")).unwrap(),
        "<inner><outer>x</inner></outer>"
    );
    assert_eq!(
        *log.lock().unwrap(),
        vec!["outer:before", "inner:before", "inner:after", "outer:after"]
    );
}

#[test]
fn declared_after_order_opts_out_of_reversal() {
    let dir = TestSite::new();
    dir.write("a.txt", "x");
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut first = Wrapper::new("first", &log);
    first.order = AfterOrder::Declared;
    let site = site_with(
        &dir,
        vec![
            Arc::new(first),
            Arc::new(Wrapper::new("second", &log)),
            Arc::new(Wrapper::new("third", &log)),
        ],
    );

    site.generator()
        .generate_resource_at(Path::new("a.txt"))
        .unwrap();

    let after: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.ends_with(":after"))
        .cloned()
        .collect();
    assert_eq!(after, vec!["third:after", "second:after", "first:after"]);
}

#[test]
fn one_failing_resource_does_not_stop_the_run() {
    let dir = TestSite::new();
    dir.write("good.txt", "ok");
    dir.write("bad.txt", "nope");
    dir.write("index.md", "# Home");
    let site = site_with(&dir, vec![Arc::new(Picky)]);

    let report = site.generator().generate_all(&CancelToken::new()).unwrap();

    assert_eq!(report.written(), 2);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.path, Path::new("bad.txt"));
    assert!(matches!(
        failure.error,
        GenerationError::Hook {
            plugin: "picky",
            stage: HookStage::AfterGeneration,
            ..
        }
    ));
    assert!(dir.deploy("good.txt").exists());
    assert!(!dir.deploy("bad.txt").exists());
}

#[test]
fn resolve_hook_can_move_output() {
    let dir = TestSite::new();
    dir.write("notes/a.txt", "moved");
    dir.write("notes/b.css", "stays");
    let site = site_with(&dir, vec![Arc::new(Relocate)]);

    let report = site.generator().generate_all(&CancelToken::new()).unwrap();

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(dir.deploy("text/notes/a.txt")).unwrap(),
        "moved"
    );
    assert!(dir.deploy("notes/b.css").exists());
    assert!(!dir.deploy("notes/a.txt").exists());
}

#[test]
fn cancelled_run_reports_everything_as_cancelled() {
    let dir = TestSite::new();
    dir.write("a.txt", "a");
    dir.write("b/c.txt", "c");
    let site = dir.open();

    let cancel = CancelToken::new();
    cancel.cancel();
    let report = site.generator().generate_all(&cancel).unwrap();

    assert!(report.generated.is_empty());
    assert_eq!(report.cancelled.len(), 2);
    assert!(!report.is_success());
}

#[test]
fn second_build_skips_unchanged_resources() {
    let dir = TestSite::new();
    dir.write("index.md", "# Home");
    dir.write("robots.txt", "User-agent: *");

    let first = dir.open().generator().generate_all(&CancelToken::new()).unwrap();
    assert_eq!(first.written(), 2);

    let second = dir.open().generator().generate_all(&CancelToken::new()).unwrap();
    assert_eq!(second.unchanged(), 2);
    assert!(
        second
            .generated
            .iter()
            .all(|g| g.outcome == Outcome::Unchanged)
    );

    let forced = dir
        .open()
        .force(true)
        .generator()
        .generate_all(&CancelToken::new())
        .unwrap();
    assert_eq!(forced.written(), 2);
}

#[test]
fn config_change_rebuilds_unchanged_sources() {
    let dir = TestSite::new();
    dir.config("plugins = []\n");
    dir.write("index.md", "# Home");
    let plain = site_with(&dir, Vec::new());
    plain
        .generator()
        .generate_resource_at(Path::new("index.md"))
        .unwrap();

    dir.config("plugins = []\nignore = [\"*.draft\"]\n");
    let later = SystemTime::now() + Duration::from_secs(5);
    fs::File::options()
        .write(true)
        .open(dir.root().join("site.toml"))
        .unwrap()
        .set_modified(later)
        .unwrap();

    let bannered = site_with(&dir, vec![Arc::new(Banner)]);
    let generated = bannered
        .generator()
        .generate_resource_at(Path::new("index.md"))
        .unwrap();

    assert_eq!(generated.outcome, Outcome::Written);
    let html = fs::read_to_string(dir.deploy("index.md")).unwrap();
    assert!(html.ends_with("<footer>banner</footer>"));
}

#[test]
fn markdown_is_rendered_into_deploy_tree() {
    let dir = TestSite::new();
    dir.write("blog/post.md", "# Title\n\nBody text.");
    let site = dir.open();

    site.generator()
        .generate_resource_at(Path::new("blog/post.md"))
        .unwrap();

    let html = fs::read_to_string(dir.deploy("blog/post.md")).unwrap();
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.contains("<p>Body text.</p>"));
}

#[test]
fn digest_attribute_only_on_media() {
    let dir = TestSite::new();
    dir.config("plugins = [\"digest\"]\n");
    dir.write("media/logo.svg", "<svg/>");
    dir.write("style.css", "body{}");
    let site = dir.open();

    let logo = site.registry().resolve(Path::new("media/logo.svg")).unwrap();
    let digest = logo.attribute(DIGEST_ATTRIBUTE).and_then(|v| v.as_str()).unwrap();
    assert_eq!(digest.len(), 64);

    let css = site.registry().resolve(Path::new("style.css")).unwrap();
    assert!(css.attribute(DIGEST_ATTRIBUTE).is_none());
}

#[test]
fn ignored_and_deploy_files_are_not_scanned() {
    let dir = TestSite::new();
    dir.config("deploy_root = \"content/_site\"\nignore = [\"*.draft\", \".*\"]\n");
    dir.write("index.md", "# Home");
    dir.write("wip.draft", "later");
    dir.write(".env", "SECRET=1");
    dir.write("_site/old.html", "stale output");
    let site = dir.open();

    let mut paths: Vec<String> = site
        .registry()
        .all()
        .map(|r| r.unwrap().relative_path().to_string_lossy().into_owned())
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["index.md"]);
}
