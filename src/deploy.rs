//! Deployment orchestrator
//!
//! Builds the constructor arguments for a chain profile, shows the
//! operator exactly what will be submitted, and broadcasts one
//! contract-creation transaction after an affirmative confirmation.

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{utils::format_ether, Address, Bytes, B256};

use crate::artifact::ContractArtifact;
use crate::chain::ChainClient;
use crate::config::{ChainProfile, ResolvedArg};
use crate::operator::Operator;
use crate::{Error, Result};

/// Outcome of a confirmed, mined deployment.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub address: Address,
    pub tx_hash: B256,
    pub verify_command: String,
}

/// ABI-encode constructor arguments in their configured order.
pub fn encode_constructor_args(args: &[ResolvedArg]) -> Vec<u8> {
    let values: Vec<DynSolValue> = args.iter().map(ResolvedArg::to_sol_value).collect();
    DynSolValue::Tuple(values).abi_encode_params()
}

/// Copy-pasteable verification command, quoting the arguments in the
/// order they were deployed with.
pub fn verify_command(
    profile: &ChainProfile,
    address: Address,
    args: &[ResolvedArg],
) -> String {
    let quoted: Vec<String> = args.iter().map(|arg| format!("\"{arg}\"")).collect();
    format!(
        "npx hardhat verify --network {} \"{address}\" {}",
        profile.name,
        quoted.join(" ")
    )
}

/// Deploy the contract to the profile's chain.
///
/// Declined confirmation aborts with [`Error::Cancelled`] and zero
/// transactions submitted. When confirmed, exactly one contract-creation
/// transaction is broadcast.
pub async fn run(
    client: &dyn ChainClient,
    profile: &ChainProfile,
    artifact: &ContractArtifact,
    operator: &mut dyn Operator,
) -> Result<DeployOutcome> {
    let deployer = client.sender();
    let args = profile.resolve_args(deployer);

    println!("Deployer wallet is {deployer}");
    let balance = client.native_balance().await?;
    println!(
        "Balance of {deployer} on {} = {} {}",
        profile.display_name,
        format_ether(balance),
        profile.currency
    );

    let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
    println!(
        "Will deploy {} on {} with args: [{}]",
        artifact.contract_name,
        profile.display_name,
        rendered.join(", ")
    );

    if !operator.confirm("Do you want to proceed with the deployment? (Y/N) ")? {
        return Err(Error::Cancelled);
    }

    println!("Waiting for transaction...");
    let mut init_code = artifact.creation_code()?.to_vec();
    init_code.extend_from_slice(&encode_constructor_args(&args));

    let deployed = client.deploy_contract(Bytes::from(init_code)).await?;

    tracing::info!(
        address = %deployed.address,
        tx = %deployed.tx_hash,
        network = %profile.name,
        "contract deployed"
    );
    println!(
        "{} deployed: {}",
        artifact.contract_name,
        profile.address_link(deployed.address)
    );

    let verify_command = verify_command(profile, deployed.address, &args);
    println!("To verify, run: {verify_command}");

    Ok(DeployOutcome {
        address: deployed.address,
        tx_hash: deployed.tx_hash,
        verify_command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::MockChainClient;
    use crate::config::{ChainRegistry, ConstructorArg};
    use crate::operator::ScriptedOperator;
    use alloy::primitives::address;

    fn four_arg_profile() -> ChainProfile {
        ChainProfile {
            name: "arbitrum".to_string(),
            display_name: "Arbitrum One".to_string(),
            rpc_url: "https://arb1.arbitrum.io/rpc".to_string(),
            explorer_url: "https://arbiscan.io".to_string(),
            currency: "ETH".to_string(),
            endpoint_address: address!("0x1a44076050125825900e736c501f859c50fE728c"),
            endpoint_id: 30110,
            constructor_args: vec![
                ConstructorArg::Endpoint,
                ConstructorArg::Address(address!(
                    "0x451F52446EBD4376d4a05f4267eF1a03Acf1aAf4"
                )),
                ConstructorArg::Deployer,
                ConstructorArg::Eid,
            ],
        }
    }

    fn artifact() -> ContractArtifact {
        ContractArtifact {
            contract_name: "Orderbook".to_string(),
            bytecode: "0x6080604052".to_string(),
        }
    }

    #[test]
    fn encodes_four_args_in_order() {
        let deployer = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let args = four_arg_profile().resolve_args(deployer);
        let encoded = encode_constructor_args(&args);

        // Four head words: three addresses and one uint256.
        assert_eq!(encoded.len(), 4 * 32);
        // Addresses are left-padded to 32 bytes.
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(
            &encoded[12..32],
            address!("0x1a44076050125825900e736c501f859c50fE728c").as_slice()
        );
        assert_eq!(&encoded[76..96], deployer.as_slice());
        // EID 30110 = 0x759e in the last word.
        assert_eq!(&encoded[126..128], &[0x75, 0x9e]);
    }

    #[tokio::test]
    async fn confirmed_deploy_submits_exactly_one_transaction() {
        let client = MockChainClient::new(None);
        let profile = four_arg_profile();
        let mut operator = ScriptedOperator::new(["y"]);

        let outcome = run(&client, &profile, &artifact(), &mut operator)
            .await
            .unwrap();

        let deployments = client.deployments.lock().unwrap();
        assert_eq!(deployments.len(), 1);
        assert_ne!(outcome.address, Address::ZERO);

        // Init code is creation bytecode followed by the encoded args.
        let args = profile.resolve_args(client.sender);
        let expected_tail = encode_constructor_args(&args);
        let init_code = &deployments[0];
        assert!(init_code.starts_with(&[0x60, 0x80, 0x60, 0x40, 0x52]));
        assert!(init_code.ends_with(&expected_tail));
    }

    #[tokio::test]
    async fn declined_deploy_submits_nothing() {
        let client = MockChainClient::new(None);
        let profile = four_arg_profile();

        for answer in ["", "n", "no", "maybe"] {
            let mut operator = ScriptedOperator::new([answer]);
            let err = run(&client, &profile, &artifact(), &mut operator)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Cancelled));
        }

        assert!(client.deployments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn uppercase_confirmation_proceeds() {
        let client = MockChainClient::new(None);
        let mut operator = ScriptedOperator::new(["Y"]);

        run(&client, &four_arg_profile(), &artifact(), &mut operator)
            .await
            .unwrap();

        assert_eq!(client.deployments.lock().unwrap().len(), 1);
    }

    #[test]
    fn verify_command_quotes_args_in_original_order() {
        let profile = four_arg_profile();
        let deployer = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let deployed = address!("0xE15f0BD64033cCCD807129D98732392C7aebceD6");
        let args = profile.resolve_args(deployer);

        let command = verify_command(&profile, deployed, &args);

        assert_eq!(
            command,
            format!(
                "npx hardhat verify --network arbitrum \"{deployed}\" \
                 \"0x1a44076050125825900e736c501f859c50fE728c\" \
                 \"0x451F52446EBD4376d4a05f4267eF1a03Acf1aAf4\" \
                 \"{deployer}\" \"30110\""
            )
        );
    }

    #[test]
    fn builtin_three_arg_profile_encodes_three_words() {
        let registry = ChainRegistry::builtin();
        let profile = registry.resolve("arbitrum").unwrap();
        let args =
            profile.resolve_args(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert_eq!(encode_constructor_args(&args).len(), 3 * 32);
    }
}
