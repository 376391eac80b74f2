//! Markmap outline rendering
//!
//! Each report is a markdown document with a markmap front matter block, one
//! `#` heading, and nested headings or bullets below it. Absent values render
//! as empty strings.

use crate::graph::users::User;
use crate::report::grouping::{LocationGroups, ManagerTree, UserGroups};
use std::collections::HashSet;
use std::io::{self, Write};

/// Front matter shared by every report
pub const FRONT_MATTER: [&str; 4] = ["---", "markmap:", "  colorFreezeLevel: 6", "---"];

/// Which two attributes follow a user's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    /// `job title (department)`
    JobTitleDepartment,
    /// `job title (office location)`
    JobTitleOffice,
    /// `department (office location)`
    DepartmentOffice,
    /// `department (job title)`
    DepartmentJobTitle,
}

impl Detail {
    fn fields<'u>(&self, user: &'u User) -> (&'u str, &'u str) {
        match self {
            Detail::JobTitleDepartment => (text(&user.job_title), text(&user.department)),
            Detail::JobTitleOffice => (text(&user.job_title), text(&user.office_location)),
            Detail::DepartmentOffice => (text(&user.department), text(&user.office_location)),
            Detail::DepartmentJobTitle => (text(&user.department), text(&user.job_title)),
        }
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Write the front matter and the report heading
pub fn write_header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    for line in FRONT_MATTER {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "# {}", title)
}

/// Write a user as a bullet followed by its detail line
fn write_member<W: Write>(
    out: &mut W,
    indent: &str,
    user: &User,
    detail: Detail,
) -> io::Result<()> {
    let (first, second) = detail.fields(user);
    writeln!(out, "{}- {}", indent, user.display_name)?;
    writeln!(out, "{}  {} ({})", indent, first, second)
}

/// Render the manager hierarchy
///
/// Roots become `##` headings; direct reports follow depth-first as bullets,
/// indented two spaces deeper per level. A user is emitted at most once, so
/// duplicated ids or cyclic manager data cannot loop.
pub fn render_manager_tree<W: Write>(
    out: &mut W,
    title: &str,
    tree: &ManagerTree<'_>,
) -> io::Result<()> {
    write_header(out, title)?;

    let mut visited: HashSet<&str> = HashSet::new();
    for root in tree.roots() {
        writeln!(out, "## {}", root.display_name)?;
        visited.insert(root.id.as_str());
        write_reports(out, tree, &root.id, 0, &mut visited)?;
    }

    Ok(())
}

fn write_reports<'a, W: Write>(
    out: &mut W,
    tree: &ManagerTree<'a>,
    manager_id: &str,
    level: usize,
    visited: &mut HashSet<&'a str>,
) -> io::Result<()> {
    let indent = " ".repeat(level);
    for &user in tree.reports_of(manager_id) {
        if !visited.insert(user.id.as_str()) {
            continue;
        }
        write_member(out, &indent, user, Detail::JobTitleDepartment)?;
        write_reports(out, tree, &user.id, level + 2, visited)?;
    }
    Ok(())
}

/// Render one `##` section per group
pub fn render_groups<W: Write>(
    out: &mut W,
    title: &str,
    groups: &UserGroups<'_>,
    detail: Detail,
) -> io::Result<()> {
    write_header(out, title)?;

    for (key, members) in groups.iter() {
        writeln!(out, "## {}", key.unwrap_or(""))?;
        for user in members {
            write_member(out, "", user, detail)?;
        }
    }

    Ok(())
}

/// Render country, city and office location as `##`, `###` and `####`
pub fn render_locations<W: Write>(
    out: &mut W,
    title: &str,
    countries: &LocationGroups<'_>,
) -> io::Result<()> {
    write_header(out, title)?;

    for (country, cities) in countries.iter() {
        writeln!(out, "## {}", country.unwrap_or(""))?;
        for (city, offices) in cities.iter() {
            writeln!(out, "### {}", city.unwrap_or(""))?;
            for (office, members) in offices.iter() {
                writeln!(out, "#### {}", office.unwrap_or(""))?;
                for user in members {
                    write_member(out, "", user, Detail::DepartmentJobTitle)?;
                }
            }
        }
    }

    Ok(())
}
