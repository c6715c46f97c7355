use crate::error::AirdropError;
use crate::eth::check_allowance;
use crate::wallet::ContractReader;
use serde::Serialize;
use web3::types::{Address, U256};

/// Allowance snapshot taken right before submission. Nothing locks the on-chain value,
/// so the snapshot may already be stale when it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceState {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub approved: U256,
}

impl AllowanceState {
    /// Approval is requested only when the current allowance cannot cover the total
    pub fn needs_approval(&self, total: U256) -> bool {
        self.approved < total
    }
}

pub async fn read_allowance(
    reader: &dyn ContractReader,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<AllowanceState, AirdropError> {
    let approved = check_allowance(reader, owner, token, spender).await?;
    Ok(AllowanceState {
        token,
        owner,
        spender,
        approved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_approval() {
        let state = AllowanceState {
            token: Address::from_low_u64_be(1),
            owner: Address::from_low_u64_be(2),
            spender: Address::from_low_u64_be(3),
            approved: U256::from(30),
        };
        assert!(!state.needs_approval(U256::from(29)));
        assert!(!state.needs_approval(U256::from(30)));
        assert!(state.needs_approval(U256::from(31)));

        let max = AllowanceState {
            approved: U256::max_value(),
            ..state
        };
        assert!(!max.needs_approval(U256::max_value()));
    }
}
