//! The approval-gated control loop.
//!
//! One user turn flows strictly Reasoning → Planning → AwaitingApproval →
//! Executing → Reasoning until the model answers without requesting tools.
//! Nothing executes without an affirmative decision from the [`Approver`]
//! for that exact batch of calls; a rejection feeds a declined notice back
//! to the reasoning step instead.

use anyhow::Result;
use colored::Colorize;

use crate::approval::{Approver, Decision};
use crate::constants::{DECLINED_NOTICE, RESULT_PREVIEW_MAX};
use crate::format;
use crate::message::{Message, Role, ToolCall};
use crate::planner::{self, Plan};
use crate::provider::ChatBackend;
use crate::tools::{ToolRegistry, ToolResult};

/// Control loop states. Data the next state needs rides along in the
/// variant, so illegal jumps (e.g. executing calls that were never
/// reviewed) don't typecheck.
enum TurnState {
    Reasoning,
    Planning { calls: Vec<ToolCall> },
    AwaitingApproval { plan: Option<Plan>, calls: Vec<ToolCall> },
    Executing { calls: Vec<ToolCall> },
    Done { answer: String },
}

/// Runs one user turn to completion and returns the final answer.
///
/// `history` must already end with the new user message. Every message the
/// turn produces (assistant tool-call proposals, tool results, declined
/// notices, the final answer) is appended in order, so history length never
/// decreases.
///
/// `max_turns` caps reasoning→execution round-trips; the model otherwise
/// decides when to stop requesting tools.
pub async fn run_turn(
    backend: &dyn ChatBackend,
    history: &mut Vec<Message>,
    tools: &ToolRegistry,
    gate: &dyn Approver,
    max_turns: usize,
) -> Result<String> {
    let definitions = tools.definitions();
    let mut rounds = 0;
    let mut state = TurnState::Reasoning;

    loop {
        state = match state {
            TurnState::Reasoning => {
                anyhow::ensure!(
                    rounds < max_turns,
                    "Stopping after {} tool rounds without a final answer",
                    max_turns
                );
                rounds += 1;

                let outcome = backend.chat(history, &definitions).await?;
                if outcome.tool_calls.is_empty() {
                    history.push(Message::assistant(&outcome.text));
                    TurnState::Done {
                        answer: outcome.text,
                    }
                } else {
                    history.push(Message::assistant_with_calls(
                        &outcome.text,
                        outcome.tool_calls.clone(),
                    ));

                    // Schema-check each proposed call. Invalid calls are
                    // answered with error results right away; only valid
                    // ones go on to planning and approval.
                    let mut valid = Vec::new();
                    for call in outcome.tool_calls {
                        match tools.validate(&call.name, &call.arguments) {
                            Ok(()) => valid.push(call),
                            Err(e) => {
                                history
                                    .push(Message::tool_result(&call.id, format!("Error: {}", e)));
                            }
                        }
                    }

                    if valid.is_empty() {
                        TurnState::Reasoning
                    } else {
                        TurnState::Planning { calls: valid }
                    }
                }
            }

            TurnState::Planning { calls } => {
                let query = last_user_query(history);
                // A failed planner call degrades to "no plan": the gate still
                // shows the exact calls, which is what approval is based on.
                let plan = match planner::plan_for(backend, &query, &calls).await {
                    Ok(plan) => Some(plan),
                    Err(e) => {
                        eprintln!("{} plan generation failed: {}", "warning:".yellow(), e);
                        None
                    }
                };
                TurnState::AwaitingApproval { plan, calls }
            }

            TurnState::AwaitingApproval { plan, calls } => {
                match gate.review(plan.as_ref(), &calls)? {
                    Decision::Proceed => TurnState::Executing { calls },
                    Decision::Cancel => {
                        println!("{}", "Tool execution cancelled.".dimmed());
                        for call in &calls {
                            history.push(Message::tool_result(&call.id, DECLINED_NOTICE));
                        }
                        TurnState::Reasoning
                    }
                }
            }

            TurnState::Executing { calls } => {
                for call in calls {
                    println!(
                        "{} {}{}",
                        "→".dimmed(),
                        call.name.yellow(),
                        format!("({})", call.arguments).dimmed()
                    );
                    // Invocation failures are results, not turn failures:
                    // the reasoning step decides how to respond.
                    let result = match tools.execute(&call.name, call.arguments.clone()).await {
                        Ok(result) => result,
                        Err(e) => ToolResult::error(format!("Error: {}", e)),
                    };
                    let preview = format::truncate(&result.content, RESULT_PREVIEW_MAX);
                    if result.is_error {
                        println!("  {}", preview.red().dimmed());
                    } else {
                        println!("  {}", preview.dimmed());
                    }
                    history.push(Message::tool_result(&call.id, result.content));
                }
                TurnState::Reasoning
            }

            TurnState::Done { answer } => return Ok(answer),
        };
    }
}

/// The most recent user message, which is what the plan should be about.
fn last_user_query(history: &[Message]) -> String {
    history
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .map(|m| m.text().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatOutcome;
    use crate::tools::{Tool, ToolDefinition};
    use anyhow::Result;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Scripted backend: pops chat outcomes in order, counts planner calls.
    struct ScriptedBackend {
        outcomes: Mutex<Vec<ChatOutcome>>,
        plans_requested: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(mut outcomes: Vec<ChatOutcome>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                plans_requested: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat(
            &self,
            _history: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<ChatOutcome> {
            Ok(self
                .outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| ChatOutcome::text_only("Done.")))
        }

        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
            self.plans_requested.fetch_add(1, Ordering::SeqCst);
            Ok("1. Fetch data\n2. Reason\n3. Output".to_string())
        }
    }

    /// Always answers the same way; records how many reviews happened.
    struct ScriptedApprover {
        decision: Decision,
        reviews: AtomicUsize,
    }

    impl ScriptedApprover {
        fn new(decision: Decision) -> Self {
            Self {
                decision,
                reviews: AtomicUsize::new(0),
            }
        }
    }

    impl Approver for ScriptedApprover {
        fn review(&self, _plan: Option<&Plan>, _calls: &[ToolCall]) -> Result<Decision> {
            self.reviews.fetch_add(1, Ordering::SeqCst);
            Ok(self.decision)
        }
    }

    /// Records every execution and echoes a canned payload. The counter and
    /// input log are shared handles so tests can observe them after the tool
    /// moves into the registry.
    struct CountingTool {
        name: &'static str,
        required: &'static str,
        calls: Arc<AtomicUsize>,
        last_input: Arc<Mutex<Option<Value>>>,
    }

    impl CountingTool {
        fn new(name: &'static str, required: &'static str) -> Self {
            Self {
                name,
                required,
                calls: Arc::new(AtomicUsize::new(0)),
                last_input: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait::async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "test tool"
        }
        fn schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { self.required: {"type": "string"} },
                "required": [self.required]
            })
        }
        async fn execute(&self, input: Value) -> Result<ToolResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = Some(input);
            Ok(ToolResult::success("{\"temperature\": 11.2}".to_string()))
        }
    }

    fn weather_call(city: &str) -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: "get_weather".to_string(),
            arguments: json!({"city": city}),
        }
    }

    fn registry_with(tool: CountingTool) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(tool));
        registry
    }

    #[tokio::test]
    async fn approved_weather_turn_calls_the_tool_exactly_once() {
        let backend = ScriptedBackend::new(vec![
            ChatOutcome {
                text: String::new(),
                tool_calls: vec![weather_call("London")],
            },
            ChatOutcome::text_only("It is 11°C in London."),
        ]);
        let gate = ScriptedApprover::new(Decision::Proceed);
        let tool = CountingTool::new("get_weather", "city");
        let calls = tool.calls.clone();
        let last_input = tool.last_input.clone();
        let registry = registry_with(tool);

        let mut history = vec![Message::user("what is the weather in London?")];
        let answer = run_turn(&backend, &mut history, &registry, &gate, 6)
            .await
            .unwrap();

        assert_eq!(answer, "It is 11°C in London.");
        // Exactly one execution, with the exact argument mapping.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            last_input.lock().unwrap().clone(),
            Some(json!({"city": "London"}))
        );
        assert_eq!(gate.reviews.load(Ordering::SeqCst), 1);
        assert_eq!(backend.plans_requested.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_approval_executes_nothing() {
        let backend = ScriptedBackend::new(vec![
            ChatOutcome {
                text: String::new(),
                tool_calls: vec![weather_call("London")],
            },
            ChatOutcome::text_only("Understood, I won't look that up."),
        ]);
        let gate = ScriptedApprover::new(Decision::Cancel);
        let tool = CountingTool::new("get_weather", "city");
        let calls = tool.calls.clone();
        let registry = registry_with(tool);

        let mut history = vec![Message::user("what is the weather in London?")];
        let answer = run_turn(&backend, &mut history, &registry, &gate, 6)
            .await
            .unwrap();

        assert_eq!(answer, "Understood, I won't look that up.");
        // The tool provider received zero calls this turn.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // The reasoning step was told the user declined.
        assert!(history
            .iter()
            .any(|m| m.role == Role::Tool && m.text() == DECLINED_NOTICE));
    }

    #[tokio::test]
    async fn text_only_turn_never_invokes_the_planner() {
        let backend = ScriptedBackend::new(vec![ChatOutcome::text_only("Hello!")]);
        let gate = ScriptedApprover::new(Decision::Proceed);
        let registry = registry_with(CountingTool::new("get_weather", "city"));

        let mut history = vec![Message::user("hi")];
        let answer = run_turn(&backend, &mut history, &registry, &gate, 6)
            .await
            .unwrap();

        assert_eq!(answer, "Hello!");
        assert_eq!(backend.plans_requested.load(Ordering::SeqCst), 0);
        assert_eq!(gate.reviews.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn history_grows_monotonically_across_turns() {
        let backend = ScriptedBackend::new(vec![
            ChatOutcome {
                text: String::new(),
                tool_calls: vec![weather_call("Paris")],
            },
            ChatOutcome::text_only("Sunny in Paris."),
            ChatOutcome::text_only("You're welcome!"),
        ]);
        let gate = ScriptedApprover::new(Decision::Proceed);
        let registry = registry_with(CountingTool::new("get_weather", "city"));

        let mut history = vec![Message::user("weather in Paris?")];
        let mut lengths = vec![history.len()];

        run_turn(&backend, &mut history, &registry, &gate, 6)
            .await
            .unwrap();
        lengths.push(history.len());

        history.push(Message::user("thanks"));
        run_turn(&backend, &mut history, &registry, &gate, 6)
            .await
            .unwrap();
        lengths.push(history.len());

        assert!(lengths.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn invalid_calls_skip_planning_and_approval() {
        // Unknown tool plus a missing required argument: nothing to approve.
        let backend = ScriptedBackend::new(vec![
            ChatOutcome {
                text: String::new(),
                tool_calls: vec![
                    ToolCall {
                        id: "call_a".into(),
                        name: "brave_search".into(),
                        arguments: json!({"query": "x"}),
                    },
                    ToolCall {
                        id: "call_b".into(),
                        name: "get_weather".into(),
                        arguments: json!({"town": "London"}),
                    },
                ],
            },
            ChatOutcome::text_only("I could not call those tools."),
        ]);
        let gate = ScriptedApprover::new(Decision::Proceed);
        let registry = registry_with(CountingTool::new("get_weather", "city"));

        let mut history = vec![Message::user("weather?")];
        run_turn(&backend, &mut history, &registry, &gate, 6)
            .await
            .unwrap();

        assert_eq!(gate.reviews.load(Ordering::SeqCst), 0);
        assert_eq!(backend.plans_requested.load(Ordering::SeqCst), 0);
        // Both call IDs were answered with errors so the wire stays valid.
        let errors: Vec<_> = history
            .iter()
            .filter(|m| m.role == Role::Tool && m.text().starts_with("Error:"))
            .collect();
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn round_cap_stops_a_tool_hungry_model() {
        // Model endlessly requests tools; gate auto-approves.
        let outcomes: Vec<ChatOutcome> = (0..10)
            .map(|i| ChatOutcome {
                text: String::new(),
                tool_calls: vec![ToolCall {
                    id: format!("call_{}", i),
                    name: "get_weather".into(),
                    arguments: json!({"city": "London"}),
                }],
            })
            .collect();
        let backend = ScriptedBackend::new(outcomes);
        let gate = ScriptedApprover::new(Decision::Proceed);
        let registry = registry_with(CountingTool::new("get_weather", "city"));

        let mut history = vec![Message::user("weather forever")];
        let err = run_turn(&backend, &mut history, &registry, &gate, 3)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("3 tool rounds"));
    }
}
