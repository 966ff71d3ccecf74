//! `PruneHistory`: an LRU over conversation turns so the History class fits
//! its budget. Middle turns drop first; the current (last) turn and the
//! most recent assistant turn are never dropped.

use crate::domain::ConversationTurn;

use super::tokenizer::Tokenizer;

pub fn prune_history(turns: &[ConversationTurn], tokenizer: &dyn Tokenizer, max_tokens: u32) -> Vec<ConversationTurn> {
    if turns.is_empty() {
        return Vec::new();
    }

    let last_idx = turns.len() - 1;
    let last_assistant_idx = turns[..last_idx].iter().rposition(|t| t.role == "assistant");

    let mut pinned = vec![last_idx];
    if let Some(idx) = last_assistant_idx {
        pinned.push(idx);
    }

    let mut used: u32 = pinned.iter().map(|&i| tokenizer.count(&turns[i].content)).sum();
    let mut kept: Vec<usize> = pinned.clone();

    for idx in (0..last_idx).rev() {
        if pinned.contains(&idx) {
            continue;
        }
        let cost = tokenizer.count(&turns[idx].content);
        if used + cost > max_tokens {
            continue;
        }
        used += cost;
        kept.push(idx);
    }

    kept.sort_unstable();
    kept.into_iter().map(|i| turns[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tokenizer::ApproxTokenizer;
    use chrono::Utc;

    fn turn(role: &str, content: &str) -> ConversationTurn {
        ConversationTurn { role: role.to_string(), content: content.to_string(), timestamp: Utc::now() }
    }

    #[test]
    fn empty_history_prunes_to_empty() {
        assert!(prune_history(&[], &ApproxTokenizer, 100).is_empty());
    }

    #[test]
    fn current_turn_and_last_assistant_always_survive() {
        let turns = vec![
            turn("user", "first message padding padding padding padding padding"),
            turn("assistant", "first reply padding padding padding padding padding"),
            turn("user", "current task"),
        ];
        let pruned = prune_history(&turns, &ApproxTokenizer, 1);
        assert_eq!(pruned.len(), 2);
        assert_eq!(pruned.last().unwrap().content, "current task");
        assert_eq!(pruned[0].role, "assistant");
    }

    #[test]
    fn generous_budget_keeps_everything() {
        let turns = vec![turn("user", "a"), turn("assistant", "b"), turn("user", "c")];
        assert_eq!(prune_history(&turns, &ApproxTokenizer, 10_000).len(), 3);
    }
}
