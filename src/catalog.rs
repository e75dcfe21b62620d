//! Projects and labels.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Label, Project};

/// Projects a fresh data directory starts with.
pub fn default_projects() -> Vec<Project> {
    vec![
        Project { id: "proj-1".into(), name: "Work".into(), color: "sky".into() },
        Project { id: "proj-2".into(), name: "Personal".into(), color: "emerald".into() },
        Project { id: "proj-3".into(), name: "Study".into(), color: "amber".into() },
    ]
}

/// Labels a fresh data directory starts with. All are global.
pub fn default_labels() -> Vec<Label> {
    vec![
        Label { id: "lab-1".into(), name: "Urgent".into(), color: "red".into(), project_id: None },
        Label { id: "lab-2".into(), name: "Important".into(), color: "indigo".into(), project_id: None },
        Label { id: "lab-3".into(), name: "Spare time".into(), color: "pink".into(), project_id: None },
    ]
}

/// Looks a project up by id, or by case-insensitive name.
pub fn find_project<'a>(projects: &'a [Project], key: &str) -> Result<&'a Project> {
    projects
        .iter()
        .find(|p| p.id == key)
        .or_else(|| projects.iter().find(|p| p.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| Error::ProjectNotFound(key.to_string()))
}

/// Looks a label up by id, or by case-insensitive name.
pub fn find_label<'a>(labels: &'a [Label], key: &str) -> Result<&'a Label> {
    labels
        .iter()
        .find(|l| l.id == key)
        .or_else(|| labels.iter().find(|l| l.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| Error::LabelNotFound(key.to_string()))
}

pub fn add_project(projects: &mut Vec<Project>, name: &str, color: &str) -> String {
    let id = format!("proj-{}", Uuid::new_v4().simple());
    projects.push(Project { id: id.clone(), name: name.to_string(), color: color.to_string() });
    id
}

/// Adds a label, scoped to `project_id` when given.
pub fn add_label(labels: &mut Vec<Label>, name: &str, color: &str, project_id: Option<String>) -> String {
    let id = format!("lab-{}", Uuid::new_v4().simple());
    labels.push(Label { id: id.clone(), name: name.to_string(), color: color.to_string(), project_id });
    id
}

/// Removes a project together with the labels scoped to it.
///
/// Returns the removed project and how many labels went with it.
pub fn remove_project(projects: &mut Vec<Project>, labels: &mut Vec<Label>, key: &str) -> Result<(Project, usize)> {
    let id = find_project(projects, key)?.id.clone();
    let idx = projects
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| Error::ProjectNotFound(key.to_string()))?;
    let removed = projects.remove(idx);
    let before = labels.len();
    labels.retain(|l| l.project_id.as_deref() != Some(id.as_str()));
    Ok((removed, before - labels.len()))
}

pub fn remove_label(labels: &mut Vec<Label>, key: &str) -> Result<Label> {
    let id = find_label(labels, key)?.id.clone();
    let idx = labels
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| Error::LabelNotFound(key.to_string()))?;
    Ok(labels.remove(idx))
}

/// Removes every project and every project-scoped label.
pub fn clear_projects(projects: &mut Vec<Project>, labels: &mut Vec<Label>) {
    projects.clear();
    labels.retain(|l| l.project_id.is_none());
}

/// Labels usable on a task in `project_id`: global ones plus the project's own.
pub fn labels_for_project<'a>(labels: &'a [Label], project_id: Option<&str>) -> Vec<&'a Label> {
    labels
        .iter()
        .filter(|l| l.project_id.is_none() || l.project_id.as_deref() == project_id)
        .collect()
}

/// Fails if `label_id` can't be used on a task in `project_id`.
///
/// Unknown labels pass; dangling references are pruned elsewhere.
pub fn check_label_scope(labels: &[Label], label_id: &str, project_id: Option<&str>) -> Result<()> {
    let Some(label) = labels.iter().find(|l| l.id == label_id) else {
        return Ok(());
    };
    if labels_for_project(labels, project_id).iter().any(|l| l.id == label.id) {
        Ok(())
    } else {
        Err(Error::LabelOutOfScope(label.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id_or_name() {
        let projects = default_projects();
        assert_eq!(find_project(&projects, "proj-2").unwrap().name, "Personal");
        assert_eq!(find_project(&projects, "study").unwrap().id, "proj-3");
        assert!(matches!(find_project(&projects, "Hobby"), Err(Error::ProjectNotFound(_))));
    }

    #[test]
    fn removing_project_drops_its_labels() {
        let mut projects = default_projects();
        let mut labels = default_labels();
        add_label(&mut labels, "Backend", "teal", Some("proj-1".into()));
        add_label(&mut labels, "Reading", "teal", Some("proj-3".into()));

        let (removed, dropped) = remove_project(&mut projects, &mut labels, "Work").unwrap();
        assert_eq!(removed.id, "proj-1");
        assert_eq!(dropped, 1);
        assert_eq!(labels.len(), 4);
        assert!(labels.iter().all(|l| l.name != "Backend"));
    }

    #[test]
    fn clearing_projects_keeps_global_labels() {
        let mut projects = default_projects();
        let mut labels = default_labels();
        add_label(&mut labels, "Backend", "teal", Some("proj-1".into()));
        clear_projects(&mut projects, &mut labels);
        assert!(projects.is_empty());
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn project_labels_include_globals() {
        let mut labels = default_labels();
        add_label(&mut labels, "Backend", "teal", Some("proj-1".into()));
        assert_eq!(labels_for_project(&labels, Some("proj-1")).len(), 4);
        assert_eq!(labels_for_project(&labels, Some("proj-2")).len(), 3);
        assert_eq!(labels_for_project(&labels, None).len(), 3);
    }

    #[test]
    fn scoped_label_only_fits_its_project() {
        let mut labels = default_labels();
        let backend = add_label(&mut labels, "Backend", "teal", Some("proj-1".into()));
        assert!(check_label_scope(&labels, &backend, Some("proj-1")).is_ok());
        assert!(matches!(check_label_scope(&labels, &backend, Some("proj-2")), Err(Error::LabelOutOfScope(_))));
        assert!(matches!(check_label_scope(&labels, &backend, None), Err(Error::LabelOutOfScope(_))));
        assert!(check_label_scope(&labels, "lab-1", Some("proj-2")).is_ok());
        assert!(check_label_scope(&labels, "lab-gone", None).is_ok());
    }
}
