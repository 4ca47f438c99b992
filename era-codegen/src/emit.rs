//! Assembly Text Emission
//!
//! Renders instruction sequences as NASM-style text: one `extern` directive
//! per referenced external symbol, then one instruction per line.

use crate::asm::AsmInst;
use std::fmt::Write;

/// Render instructions, preceded by extern declarations
pub fn emit_instructions(externs: &[String], instructions: &[AsmInst]) -> String {
    let mut output = String::new();

    for symbol in externs {
        let _ = writeln!(output, "extern {symbol}");
    }

    for inst in instructions {
        let _ = writeln!(output, "{inst}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::Reg;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_with_externs() {
        let text = emit_instructions(
            &["foo".to_string()],
            &[AsmInst::MovSym(Reg::Eax, "foo".to_string()), AsmInst::Load(Reg::Eax, Reg::Eax)],
        );

        assert_eq!(text, "extern foo\nmov eax, foo\nmov eax, [eax]\n");
    }

    #[test]
    fn test_emit_empty() {
        assert_eq!(emit_instructions(&[], &[]), "");
    }
}
