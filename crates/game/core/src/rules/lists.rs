use super::RuleError;
use crate::env::FormOracle;
use crate::form::{FormCategory, FormId};

/// Checks that a form list is acyclic and nests at most `max_depth` levels.
///
/// The top-level list sits at depth 0. Non-list members are not inspected.
///
/// # Errors
///
/// - `RuleError::CyclicFormList` naming the first list found inside itself
/// - `RuleError::FormListTooDeep` naming `list` when the bound is exceeded
pub fn validate_form_list<F>(forms: &F, list: FormId, max_depth: u32) -> Result<(), RuleError>
where
    F: FormOracle + ?Sized,
{
    let mut path = Vec::new();
    visit(forms, list, list, max_depth, &mut path)
}

fn visit<F>(
    forms: &F,
    root: FormId,
    list: FormId,
    max_depth: u32,
    path: &mut Vec<FormId>,
) -> Result<(), RuleError>
where
    F: FormOracle + ?Sized,
{
    if path.contains(&list) {
        return Err(RuleError::CyclicFormList { list });
    }
    if path.len() as u32 > max_depth {
        return Err(RuleError::FormListTooDeep {
            list: root,
            max_depth,
        });
    }

    path.push(list);
    for &member in forms.list_members(list) {
        if forms.category(member) == Some(FormCategory::FormList) {
            visit(forms, root, member, max_depth, path)?;
        }
    }
    path.pop();
    Ok(())
}
