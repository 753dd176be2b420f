use crate::model::{SectionId, ToolNode, ToolOptions};

/// Finds the options of the first active tool across `sections`.
///
/// Sections are scanned in order and nodes left to right. A node that is
/// itself active ends the scan of its section; a node pointing at a child
/// section ends it only if one of the children is active. In both cases the
/// options may be empty, in which case the next top-level section is tried.
pub fn resolve_active_options<F>(sections: &[SectionId], lookup: F) -> Option<ToolOptions>
where
    F: Fn(&SectionId) -> Vec<ToolNode>,
{
    sections
        .iter()
        .find_map(|section_id| active_in_section(&lookup(section_id), &lookup).flatten())
}

/// `Some(options)` when the section holds an active tool, `None` otherwise.
fn active_in_section<F>(nodes: &[ToolNode], lookup: &F) -> Option<Option<ToolOptions>>
where
    F: Fn(&SectionId) -> Vec<ToolNode>,
{
    for node in nodes {
        if node.is_active {
            return Some(node.options.clone());
        }
        if let Some(child_section) = &node.child_section
            && let Some(child) = lookup(child_section).into_iter().find(|child| child.is_active)
        {
            return Some(child.options);
        }
    }
    None
}
