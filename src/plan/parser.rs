//! Plan document parsing: a structured element-and-attribute tree with a
//! `<plan>` root (spec §4.6, §6).

use super::model::{Condition, Contract, Invariant, Plan, PlanMetadata};
use crate::error::{CoreError, Result};
use crate::types::{ActionVerb, Budget, Task, Touches};
use roxmltree::{Document, Node};

pub fn parse_plan(xml: &str) -> Result<Plan> {
    let doc = Document::parse(xml).map_err(|e| CoreError::PlanInvalid {
        reason: format!("malformed plan document: {e}"),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "plan" {
        return Err(CoreError::PlanInvalid {
            reason: format!("expected <plan> root, found <{}>", root.tag_name().name()),
        });
    }

    let metadata = parse_metadata(&root)?;
    let contract = parse_contract(&root)?;
    let tasks = parse_tasks(&root)?;

    Ok(Plan {
        metadata,
        contract,
        tasks,
    })
}

fn child<'a, 'input>(node: &'a Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'input>(node: &'a Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    node.children().filter(|n| n.is_element() && n.tag_name().name() == name).collect()
}

fn text_of(node: &Node) -> String {
    node.text().unwrap_or("").trim().to_string()
}

fn child_text(node: &Node, name: &str) -> String {
    child(node, name).map(|n| text_of(&n)).unwrap_or_default()
}

fn comma_split(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn parse_metadata(root: &Node) -> Result<PlanMetadata> {
    let mut fields = std::collections::BTreeMap::new();
    if let Some(metadata) = child(root, "metadata") {
        for field in metadata.children().filter(|n| n.is_element()) {
            fields.insert(field.tag_name().name().to_string(), text_of(&field));
        }
    }
    Ok(PlanMetadata { fields })
}

fn parse_contract(root: &Node) -> Result<Contract> {
    let Some(contract_node) = child(root, "contract") else {
        return Ok(Contract::default());
    };

    let preconditions = child(&contract_node, "preconditions")
        .map(|section| parse_conditions(&section))
        .unwrap_or_default();
    let postconditions = child(&contract_node, "postconditions")
        .map(|section| parse_conditions(&section))
        .unwrap_or_default();
    let invariants = child(&contract_node, "invariants")
        .map(|section| parse_invariants(&section))
        .unwrap_or_default();

    Ok(Contract {
        preconditions,
        invariants,
        postconditions,
    })
}

fn parse_conditions(section: &Node) -> Vec<Condition> {
    children(section, "condition")
        .into_iter()
        .filter_map(|node| {
            let id = node.attribute("id")?.to_string();
            Some(Condition {
                id,
                description: child_text(&node, "description"),
                verify: child_text(&node, "verify"),
            })
        })
        .collect()
}

fn parse_invariants(section: &Node) -> Vec<Invariant> {
    children(section, "invariant")
        .into_iter()
        .filter_map(|node| {
            let id = node.attribute("id")?.to_string();
            let critical = node.attribute("critical").map(|v| v == "true").unwrap_or(false);
            Some(Invariant {
                id,
                description: child_text(&node, "description"),
                verify: child_text(&node, "verify"),
                critical,
            })
        })
        .collect()
}

fn parse_tasks(root: &Node) -> Result<Vec<Task>> {
    let Some(tasks_node) = child(root, "tasks") else {
        return Ok(Vec::new());
    };

    children(&tasks_node, "task")
        .into_iter()
        .map(|node| parse_task(&node))
        .collect()
}

fn parse_task(node: &Node) -> Result<Task> {
    let id = node
        .attribute("id")
        .ok_or_else(|| CoreError::PlanInvalid {
            reason: "task element missing required id attribute".to_string(),
        })?
        .to_string();

    let action_text = child_text(node, "action");
    let action = parse_action(&action_text).ok_or_else(|| CoreError::PlanInvalid {
        reason: format!("task {id}: unrecognized action {action_text:?}"),
    })?;

    let values = comma_split(&child_text(node, "values"))
        .iter()
        .filter_map(|v| v.parse().ok())
        .collect();

    let touches = child(node, "touches")
        .map(|t| Touches {
            reads: t.attribute("reads").map(comma_split).unwrap_or_default(),
            writes: t.attribute("writes").map(comma_split).unwrap_or_default(),
        })
        .unwrap_or_default();

    let mutexes = child(node, "mutexes").map(|m| comma_split(&text_of(&m))).unwrap_or_default();

    let budget = child(node, "budget").map(|b| Budget {
        tokens: b.attribute("tokens").and_then(|v| v.parse().ok()),
        minutes: b.attribute("minutes").and_then(|v| v.parse().ok()),
    });

    Ok(Task {
        id,
        description: child_text(node, "description"),
        action,
        values,
        touches,
        mutexes,
        budget,
    })
}

fn parse_action(text: &str) -> Option<ActionVerb> {
    match text.trim().to_lowercase().as_str() {
        "implement" => Some(ActionVerb::Implement),
        "test" => Some(ActionVerb::Test),
        "document" => Some(ActionVerb::Document),
        "refactor" => Some(ActionVerb::Refactor),
        "migrate" => Some(ActionVerb::Migrate),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> &'static str {
        r#"
<plan>
  <metadata>
    <name>auth-rollout</name>
    <owner>platform</owner>
  </metadata>
  <contract>
    <preconditions>
      <condition id="pre-1">
        <description>repo is clean</description>
        <verify>git diff --quiet</verify>
      </condition>
    </preconditions>
    <invariants>
      <invariant id="inv-1" critical="true">
        <description>tests pass</description>
        <verify>cargo test</verify>
      </invariant>
    </invariants>
    <postconditions>
      <condition id="post-1">
        <description>auth works</description>
        <verify>curl -f localhost/auth</verify>
      </condition>
    </postconditions>
  </contract>
  <tasks>
    <task id="t1">
      <description>implement auth</description>
      <action>implement</action>
      <values>10, 5</values>
      <touches writes="auth" reads="core" />
      <mutexes>db</mutexes>
      <budget tokens="30000" minutes="10" />
    </task>
    <task id="t2">
      <description>wire api</description>
      <action>implement</action>
      <touches writes="api" reads="auth" />
    </task>
  </tasks>
</plan>
"#
    }

    #[test]
    fn parses_metadata_fields() {
        let plan = parse_plan(sample_plan()).unwrap();
        assert_eq!(plan.metadata.fields.get("name"), Some(&"auth-rollout".to_string()));
    }

    #[test]
    fn parses_contract_sections() {
        let plan = parse_plan(sample_plan()).unwrap();
        assert_eq!(plan.contract.preconditions.len(), 1);
        assert_eq!(plan.contract.invariants.len(), 1);
        assert!(plan.contract.invariants[0].critical);
        assert_eq!(plan.contract.postconditions.len(), 1);
    }

    #[test]
    fn parses_tasks_with_touches_and_values() {
        let plan = parse_plan(sample_plan()).unwrap();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].values, vec![10, 5]);
        assert_eq!(plan.tasks[0].touches.writes, vec!["auth".to_string()]);
        assert_eq!(plan.tasks[0].mutexes, vec!["db".to_string()]);
        assert!(plan.tasks[1].mutexes.is_empty());
    }

    #[test]
    fn parses_budget_attributes() {
        let plan = parse_plan(sample_plan()).unwrap();
        let budget = plan.tasks[0].budget.as_ref().expect("t1 declares a budget");
        assert_eq!(budget.tokens, Some(30_000));
        assert_eq!(budget.minutes, Some(10));
        assert!(plan.tasks[1].budget.is_none());
    }

    #[test]
    fn rejects_malformed_xml() {
        let err = parse_plan("<plan><unterminated>").unwrap_err();
        assert!(matches!(err, CoreError::PlanInvalid { .. }));
    }

    #[test]
    fn rejects_task_missing_id() {
        let xml = r#"<plan><tasks><task><description>x</description><action>implement</action></task></tasks></plan>"#;
        let err = parse_plan(xml).unwrap_err();
        assert!(matches!(err, CoreError::PlanInvalid { .. }));
    }

    #[test]
    fn round_trip_self_diff_is_empty() {
        let plan_a = parse_plan(sample_plan()).unwrap();
        let plan_b = parse_plan(sample_plan()).unwrap();
        let diff = super::super::diff::diff_plans(&plan_a, &plan_b);
        assert!(diff.metadata.is_empty());
        assert!(diff.contracts.is_empty());
        assert!(diff.tasks.is_empty());
    }
}
