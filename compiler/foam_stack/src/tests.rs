use super::*;

#[test]
fn nested_chain_depth_is_counted() {
    fn depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    assert_eq!(depth(200_000), 200_000);
}

#[test]
fn passes_results_through() {
    let ok: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(ok, Ok(7));
}
