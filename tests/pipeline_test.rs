//! End-to-end tests for the completion stream
//!
//! Each test builds a fake Django installation (and optionally a project)
//! on disk and runs the full pipeline against the real file system.

mod support;

use django_completions::fs::RealFileSystem;
use django_completions::{pipeline, Config};
use serial_test::serial;
use support::Fixture;

fn run_pipeline(config: &Config) -> String {
    let fs = RealFileSystem::new();
    let mut buf = Vec::new();
    pipeline::run(&fs, config, &mut buf).expect("pipeline run");
    String::from_utf8(buf).expect("utf8 stream")
}

fn config_for(fixture: &Fixture, with_project: bool) -> Config {
    Config {
        management: with_project.then(|| fixture.manage_py()),
        django_dir: Some(fixture.django_dir()),
    }
}

#[test]
fn stream_has_all_group_headers_and_terminator() {
    let fixture = Fixture::install_only();
    let out = run_pipeline(&config_for(&fixture, false));

    let settings = out.find("@@settings").expect("settings header");
    let queryset = out.find("@@queryset").expect("queryset header");
    let tags = out.find("@@htmldjangotags").expect("tags header");
    let filters = out.find("@@htmldjangofilters").expect("filters header");
    assert!(settings < queryset && queryset < tags && tags < filters);
    assert!(out.ends_with("##\n"));
}

#[test]
fn builtin_settings_documented_without_project() {
    let fixture = Fixture::install_only();
    let out = run_pipeline(&config_for(&fixture, false));

    assert!(out.contains("##DEBUG\nWhether to run in debug mode.\n"));
    assert!(out.contains(
        "##ADMINS\nPeople who get code error notifications.\\nIn the format [(\"Full Name\", \"email@example.com\")]\n"
    ));
    assert!(out.contains("##ALLOWED_HOSTS\n"));
}

#[test]
fn queryset_methods_have_signatures_and_attributes_are_bare() {
    let fixture = Fixture::install_only();
    let out = run_pipeline(&config_for(&fixture, false));

    assert!(out.contains(
        "##filter(self, *args, **kwargs)\nReturn a new QuerySet instance with the args ANDed to the\\nexisting set.\n"
    ));
    assert!(out.contains("##count(self)\nReturn the number of objects.\n"));
    // Property: bare word, no documentation line (next word follows directly)
    assert!(out.contains("##db\n##"));
}

#[test]
fn default_tags_and_filters_rendered_as_typed() {
    let fixture = Fixture::install_only();
    let out = run_pipeline(&config_for(&fixture, false));

    assert!(out.contains("##{% cycle %}\nCycle among the given strings each time this tag is encountered.\n"));
    assert!(out.contains("##{% if %}\nEvaluate a variable, and output the block contents if true.\n"));
    assert!(out.contains("##|upper\nConvert a string into all uppercase.\n"));
    assert!(out.contains("##|add\nAdd the arg to the value.\n"));
}

#[test]
fn settings_deduplicated_across_project_and_builtin() {
    let fixture = Fixture::with_project();
    let out = run_pipeline(&config_for(&fixture, true));

    // DEBUG defined in both; builtin is scanned first and keeps its doc
    assert_eq!(out.matches("##DEBUG\n").count(), 1);
    assert!(out.contains("##DEBUG\nWhether to run in debug mode.\n"));
    // Project-only settings contribute their own docs
    assert!(out.contains("##PAGE_SIZE\nItems shown on one page.\n"));
}

#[test]
fn duplicate_filter_keeps_earliest_loaded_documentation() {
    let fixture = Fixture::with_project();
    let out = run_pipeline(&config_for(&fixture, true));

    // Builtin upper loads before both apps' versions
    assert_eq!(out.matches("##|upper\n").count(), 1);
    assert!(out.contains("##|upper\nConvert a string into all uppercase.\n"));
    assert!(!out.contains("Polls' upper"));
    assert!(!out.contains("Blog's upper"));
}

#[test]
fn app_tags_discovered_with_escaped_multiline_docs() {
    let fixture = Fixture::with_project();
    let out = run_pipeline(&config_for(&fixture, true));

    assert!(out.contains(
        "##{% poll_chart %}\nRender a chart\\nspanning several lines of documentation.\n"
    ));
}

#[test]
fn escape_count_matches_original_newline_count() {
    let fixture = Fixture::with_project();
    let out = run_pipeline(&config_for(&fixture, true));

    // ADMINS has a two-line comment block: exactly one escaped newline
    let admins_doc = out
        .split("##ADMINS\n")
        .nth(1)
        .and_then(|rest| rest.lines().next())
        .expect("ADMINS doc line");
    assert_eq!(admins_doc.matches("\\n").count(), 1);

    // filter() has a two-line docstring: exactly one escaped newline
    let filter_doc = out
        .split("##filter(self, *args, **kwargs)\n")
        .nth(1)
        .and_then(|rest| rest.lines().next())
        .expect("filter doc line");
    assert_eq!(filter_doc.matches("\\n").count(), 1);
}

#[test]
fn output_is_byte_identical_across_runs() {
    let fixture = Fixture::with_project();
    let config = config_for(&fixture, true);
    assert_eq!(run_pipeline(&config), run_pipeline(&config));
}

#[test]
#[serial]
fn missing_installation_produces_empty_output() {
    // Probing must not escape the fixture into a real environment
    std::env::remove_var("VIRTUAL_ENV");

    let fixture = Fixture::install_only();
    let config = Config {
        management: None,
        django_dir: Some(fixture.dir.path().join("nowhere")),
    };
    let fs = RealFileSystem::new();
    let mut buf = Vec::new();
    pipeline::run(&fs, &config, &mut buf).expect("pipeline run");
    assert!(buf.is_empty());
}

#[test]
fn unresolvable_settings_module_degrades_to_defaults() {
    let fixture = Fixture::install_only();
    fixture.write(&fixture.manage_py(), "print('no settings module here')\n");

    let out = run_pipeline(&config_for(&fixture, true));
    assert!(out.contains("@@settings"));
    assert!(out.contains("##DEBUG\nWhether to run in debug mode.\n"));
    assert!(out.ends_with("##\n"));
}

#[test]
fn package_walk_fallback_finds_app_libraries() {
    let fixture = Fixture::install_only();
    fixture.write(
        &fixture.manage_py(),
        "os.environ.setdefault(\"DJANGO_SETTINGS_MODULE\", \"mysite.settings\")\n",
    );
    // Settings without INSTALLED_APPS force the package walk strategy
    fixture.write(
        &fixture.project_dir().join("mysite/settings.py"),
        "DEBUG = True\n",
    );
    fixture.write(
        &fixture.project_dir().join("shop/templatetags/__init__.py"),
        "",
    );
    fixture.write(
        &fixture.project_dir().join("shop/templatetags/shop_tags.py"),
        "register = template.Library()\n\n\n@register.tag\ndef basket(parser, token):\n    \"\"\"Render the basket.\"\"\"\n    return BasketNode()\n",
    );

    let out = run_pipeline(&config_for(&fixture, true));
    assert!(out.contains("##{% basket %}\nRender the basket.\n"));
}
