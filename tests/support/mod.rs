//! Shared fixtures: a fake Django installation and project on disk

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const GLOBAL_SETTINGS: &str = r#"# Whether to run in debug mode.
DEBUG = False

# People who get code error notifications.
# In the format [("Full Name", "email@example.com")]
ADMINS = []

# Hosts/domain names that are valid for this site.
ALLOWED_HOSTS = []
"#;

pub const QUERY_PY: &str = r#"class QuerySet(AltersData):
    """Represent a lazy database lookup for a set of objects."""

    def filter(self, *args, **kwargs):
        """
        Return a new QuerySet instance with the args ANDed to the
        existing set.
        """
        return self._filter_or_exclude(False, args, kwargs)

    def count(self):
        """Return the number of objects."""
        return self.query.get_count()

    @property
    def db(self):
        return self._db
"#;

pub const DEFAULT_TAGS: &str = r#"register = Library()


@register.tag
def cycle(parser, token):
    """Cycle among the given strings each time this tag is encountered."""
    return CycleNode()


@register.tag("if")
def do_if(parser, token):
    """Evaluate a variable, and output the block contents if true."""
    return IfNode()
"#;

pub const DEFAULT_FILTERS: &str = r#"register = Library()


@register.filter(is_safe=True)
@stringfilter
def upper(value):
    """Convert a string into all uppercase."""
    return value.upper()


@register.filter(is_safe=False)
def add(value, arg):
    """Add the arg to the value."""
    return value + arg
"#;

/// A fake Django installation plus project inside a TempDir
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Installation only, no project
    pub fn install_only() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let fixture = Self { dir };
        fixture.write(&fixture.django_dir().join("conf/global_settings.py"), GLOBAL_SETTINGS);
        fixture.write(&fixture.django_dir().join("db/models/query.py"), QUERY_PY);
        fixture.write(&fixture.django_dir().join("template/defaulttags.py"), DEFAULT_TAGS);
        fixture.write(&fixture.django_dir().join("template/defaultfilters.py"), DEFAULT_FILTERS);
        fixture
    }

    /// Installation plus a project with settings and two apps
    pub fn with_project() -> Self {
        let fixture = Self::install_only();
        let base = fixture.project_dir();

        fixture.write(
            &base.join("manage.py"),
            "import os\n\nos.environ.setdefault(\"DJANGO_SETTINGS_MODULE\", \"mysite.settings\")\n",
        );
        fixture.write(&base.join("mysite/__init__.py"), "");
        fixture.write(
            &base.join("mysite/settings.py"),
            r#"DEBUG = True

# Items shown on one page.
PAGE_SIZE = 25

INSTALLED_APPS = [
    "polls",
    "blog",
]
"#,
        );

        // Two apps, both defining filter `upper` with distinguishable docs
        fixture.write(&base.join("polls/__init__.py"), "");
        fixture.write(&base.join("polls/templatetags/__init__.py"), "");
        fixture.write(
            &base.join("polls/templatetags/poll_extras.py"),
            r#"register = template.Library()


@register.filter
def upper(value):
    """Polls' upper."""
    return value


@register.tag
def poll_chart(parser, token):
    """Render a chart
    spanning several lines of documentation."""
    return ChartNode()
"#,
        );

        fixture.write(&base.join("blog/__init__.py"), "");
        fixture.write(&base.join("blog/templatetags/__init__.py"), "");
        fixture.write(
            &base.join("blog/templatetags/blog_tags.py"),
            r#"register = template.Library()


@register.filter
def upper(value):
    """Blog's upper."""
    return value
"#,
        );

        fixture
    }

    pub fn django_dir(&self) -> PathBuf {
        self.dir
            .path()
            .join("venv/lib/python3.12/site-packages/django")
    }

    pub fn project_dir(&self) -> PathBuf {
        self.dir.path().join("proj")
    }

    pub fn manage_py(&self) -> PathBuf {
        self.project_dir().join("manage.py")
    }

    pub fn write(&self, path: &Path, content: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, content).expect("write fixture file");
    }
}
