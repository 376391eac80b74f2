pub mod grouping;
pub mod outline;

use crate::config::OfficeLayout;
use crate::error::Result;
use crate::graph::users::User;
use outline::Detail;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// The four generated documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Organization,
    Departments,
    JobTitles,
    OfficeLocations,
}

impl Report {
    pub const ALL: [Report; 4] = [
        Report::Organization,
        Report::Departments,
        Report::JobTitles,
        Report::OfficeLocations,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Report::Organization => "Users.md",
            Report::Departments => "Departments.md",
            Report::JobTitles => "JobTitles.md",
            Report::OfficeLocations => "OfficeLocations.md",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Report::Organization => "Organization",
            Report::Departments => "Departments",
            Report::JobTitles => "Job titles",
            Report::OfficeLocations => "Office locations",
        }
    }

    /// Group `users` and render this report into `out`
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        users: &[User],
        layout: OfficeLayout,
    ) -> std::io::Result<()> {
        let title = self.title();
        match self {
            Report::Organization => {
                outline::render_manager_tree(out, title, &grouping::by_manager(users))
            }
            Report::Departments => outline::render_groups(
                out,
                title,
                &grouping::by_department(users),
                Detail::JobTitleOffice,
            ),
            Report::JobTitles => outline::render_groups(
                out,
                title,
                &grouping::by_job_title(users),
                Detail::DepartmentOffice,
            ),
            Report::OfficeLocations => match layout {
                OfficeLayout::Nested => {
                    outline::render_locations(out, title, &grouping::by_location(users))
                }
                OfficeLayout::Flat => outline::render_groups(
                    out,
                    title,
                    &grouping::by_office_location(users),
                    Detail::DepartmentJobTitle,
                ),
            },
        }
    }
}

/// Create or truncate `dir/<report file>` and render into it
pub fn write_report(
    dir: &Path,
    report: Report,
    users: &[User],
    layout: OfficeLayout,
) -> Result<PathBuf> {
    let path = dir.join(report.file_name());
    let mut out = BufWriter::new(File::create(&path)?);
    report.render(&mut out, users, layout)?;
    out.flush()?;

    info!("Wrote {:?}", path);
    Ok(path)
}

/// Write every report into `dir`, creating it when missing
pub fn write_all(dir: &Path, users: &[User], layout: OfficeLayout) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    Report::ALL
        .iter()
        .map(|&report| write_report(dir, report, users, layout))
        .collect()
}
