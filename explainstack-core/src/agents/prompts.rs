//! Prompt templates for the built-in agents
//!
//! Each agent has one system prompt and one user-prompt renderer. Renderers
//! only substitute the caller's text into a fixed frame.

pub(crate) fn code_expert_system() -> String {
    "You are a senior Python developer who knows the OpenStack code base well. \
     Explain code clearly for a reviewer who is new to the project: what it does, \
     how the pieces fit together, and which OpenStack conventions it follows or breaks."
        .to_string()
}

pub(crate) fn code_expert_user(input: &str) -> String {
    format!(
        "Explain the following code.\n\n```python\n{}\n```\n\n\
         Cover its purpose, the main control flow, notable OpenStack patterns, \
         and anything a reviewer should double check.",
        input
    )
}

pub(crate) fn patch_reviewer_system() -> String {
    "You review Gerrit patches for OpenStack projects. Read the diff the way a core \
     reviewer would: correctness first, then tests, style and upgrade impact. \
     Be specific and quote the lines you are talking about."
        .to_string()
}

pub(crate) fn patch_reviewer_user(input: &str) -> String {
    format!(
        "Review this patch.\n\n```diff\n{}\n```\n\n\
         Summarize the change, list problems by severity, and finish with a \
         recommendation (approve, needs work, or reject).",
        input
    )
}

pub(crate) fn import_cleaner_system() -> String {
    "You organize Python imports following the OpenStack hacking rules: standard \
     library, third party, then project imports, one import per line, alphabetical \
     within each group, no unused or wildcard imports."
        .to_string()
}

pub(crate) fn import_cleaner_user(input: &str) -> String {
    format!(
        "Clean up the imports in this code.\n\n```python\n{}\n```\n\n\
         Return the corrected import block followed by a short list of what changed.",
        input
    )
}

pub(crate) fn commit_writer_system() -> String {
    "You write commit messages for OpenStack changes. Use a summary line under \
     50 characters in the imperative mood, a blank line, then a body wrapped at \
     72 columns explaining what changed and why. Add Closes-Bug or Related-Bug \
     footers when the input mentions a bug."
        .to_string()
}

pub(crate) fn commit_writer_user(input: &str) -> String {
    format!(
        "Write a commit message for this change.\n\n{}\n\n\
         Return only the commit message.",
        input
    )
}

pub(crate) fn security_expert_system() -> String {
    "You are a security engineer specializing in OpenStack and Python services. \
     Look for injection, broken authentication or authorization, unsafe \
     deserialization, secrets in code and insecure transport. Rate every finding \
     by severity and give a concrete fix."
        .to_string()
}

pub(crate) fn security_expert_user(input: &str) -> String {
    format!(
        "Perform a security review of this code.\n\n```python\n{}\n```\n\n\
         List the vulnerabilities found with severity, then remediation steps.",
        input
    )
}

pub(crate) fn performance_expert_system() -> String {
    "You are a performance engineer for large OpenStack deployments. Identify \
     algorithmic hot spots, N+1 database queries, blocking I/O and excess \
     allocation, and estimate the impact of each suggested optimization."
        .to_string()
}

pub(crate) fn performance_expert_user(input: &str) -> String {
    format!(
        "Analyze the performance of this code.\n\n```python\n{}\n```\n\n\
         Point out bottlenecks, propose optimizations with example code, and say \
         how you would measure the improvement.",
        input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderers_embed_input_verbatim() {
        let input = "def f():\n    return {'a': 1}";
        for render in [
            code_expert_user,
            patch_reviewer_user,
            import_cleaner_user,
            commit_writer_user,
            security_expert_user,
            performance_expert_user,
        ] {
            assert!(render(input).contains(input));
        }
    }

    #[test]
    fn test_system_prompts_are_not_empty() {
        for system in [
            code_expert_system,
            patch_reviewer_system,
            import_cleaner_system,
            commit_writer_system,
            security_expert_system,
            performance_expert_system,
        ] {
            assert!(!system().trim().is_empty());
        }
    }
}
