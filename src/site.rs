use chrono::Month;
use color_eyre::eyre::{Context as EyreContext, Result};
use include_dir::{
    include_dir, Dir,
    DirEntry::{Dir as DirEnt, File as FileEnt},
};
use log::{debug, info};
use num_traits::FromPrimitive;
use std::fs::{self, create_dir_all};
use std::path::PathBuf;
use tera::{Context, Tera};

use crate::config::Config;
use crate::model::catalog::Catalog;
use crate::model::filter::FilterState;
use crate::store::prefs::Theme;
use crate::store::saved::SavedEvents;
use crate::store::session::Session;
use crate::util::{delete_dir_contents, write_template};
use crate::views::month_view::{MonthContext, WEEKDAY_NAMES};

static TEMPLATE_DIR: Dir = include_dir!("templates");
static STYLESHEET: &str = include_str!("../assets/style.css");

const INDEX_TEMPLATE: &str = "index.html";

/// The rendering surface: the catalog plus the template engine.
///
/// Each render pass runs the whole pipeline from scratch: filter the
/// catalog, lay the survivors onto twelve month grids, interpolate the
/// templates. Nothing is cached between passes.
#[derive(Debug)]
pub struct Site {
    pub config: Config,
    catalog: Catalog,
    tera: Tera,
}

impl Site {
    pub fn new(config: Config) -> Result<Site> {
        let catalog = Catalog::load(&config.catalog_path())?;
        let tera = load_templates(&config)?;

        Ok(Site {
            config,
            catalog,
            tera,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Render the whole year to `output_dir/index.html` and return the path.
    pub fn render(
        &self,
        filter: &FilterState,
        session: &Session,
        saved: &SavedEvents,
        theme: Theme,
    ) -> Result<PathBuf> {
        let year = self.config.reference_year;
        let today = self.config.today_date()?;
        let visible = filter.apply(self.catalog.events(), saved);
        debug!(
            "rendering {} of {} events ({})",
            visible.len(),
            self.catalog.len(),
            filter.describe()
        );

        let mut months = Vec::with_capacity(12);
        for number in 1..=12 {
            let month = Month::from_u32(number).expect("month numbers 1-12 are always valid");
            months.push(MonthContext::build(
                month,
                year,
                Some(today),
                &visible,
                saved,
            )?);
        }

        let mut context = Context::new();
        context.insert("site_title", &self.config.site_title);
        context.insert("site_subtitle", &self.config.site_subtitle);
        context.insert("stylesheet_path", &self.config.stylesheet_path);
        context.insert("theme", theme.name());
        context.insert("year", &year);
        context.insert("weekday_names", &WEEKDAY_NAMES);
        context.insert("months", &months);
        context.insert("filter_summary", &filter.describe());
        context.insert("search", &filter.search);
        context.insert("show_only_saved", &filter.saved_only);
        context.insert("signed_in", &session.signed_in());
        context.insert("user_email", &session.email());
        context.insert("saved_count", &saved.len());
        context.insert("visible_count", &visible.len());

        self.setup_output_dir()?;
        let index_path = self.config.output_path().join("index.html");
        write_template(&self.tera, INDEX_TEMPLATE, &context, &index_path)?;
        info!("wrote {:?}", index_path);

        Ok(index_path)
    }

    fn setup_output_dir(&self) -> Result<()> {
        let output_dir = self.config.output_path();

        fs::create_dir_all(&output_dir)
            .wrap_err_with(|| format!("could not create output dir: {:?}", output_dir))?;

        if self.config.no_delete {
            info!("skipping delete of output directory as instructed...")
        } else {
            debug!("removing contents of the output directory: {:?}", output_dir);
            delete_dir_contents(&output_dir);
        }

        if self.config.copy_stylesheet_to_output {
            let styles_dir = output_dir.join("styles");
            create_dir_all(&styles_dir)?;
            fs::write(styles_dir.join("style.css"), STYLESHEET)
                .wrap_err("could not write the stylesheet")?;
        }

        Ok(())
    }
}

/// Custom templates from the configured template dir, with the bundled
/// defaults filling any gaps.
fn load_templates(config: &Config) -> Result<Tera> {
    debug!("loading custom templates...");
    let mut tera = Tera::new(&config.template_glob())?;

    debug!("loading default templates...");
    let mut default_templates = Tera::default();
    for template in TEMPLATE_DIR.find("**/*.html")? {
        match template {
            DirEnt(_) => Ok(()),
            FileEnt(t) => match (t.path().to_str(), t.contents_utf8()) {
                (Some(template_name), Some(template_contents)) => {
                    debug!("adding default template: {}", template_name);
                    default_templates.add_raw_template(template_name, template_contents)
                }
                (_, _) => Ok(()),
            },
        }?;
    }

    // extend does not overwrite, so the custom templates win
    tera.extend(&default_templates)?;

    Ok(tera)
}
