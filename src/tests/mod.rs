
/// Fixtures shared by the contract tests. Each call builds a brand new sandbox,
/// so tests never observe each other's transactions.
#[cfg(test)]
pub mod fixtures {

    use crate::{
        config::Config,
        project::{
            ContractInstance,
            Project,
        },
        sandbox::Sandbox,
        types::Address,
    };

    pub struct Context {
        pub sandbox: Sandbox,
        pub owner: Address,
        pub another: Address,
        pub flipper: ContractInstance,
    }

    pub fn sandbox() -> Sandbox {
        let _ = env_logger::builder().is_test(true).try_init();
        Sandbox::new(&Config::default())
    }

    pub fn owner(sandbox: &Sandbox) -> Address {
        sandbox.accounts()[0].address()
    }

    pub fn another(sandbox: &Sandbox) -> Address {
        sandbox.accounts()[1].address()
    }

    pub fn flipper(
        sandbox: &mut Sandbox,
        project: &Project,
        owner: &Address,
    ) -> Result<ContractInstance, Box<dyn std::error::Error>> {
        Ok(sandbox.deploy(owner, project.contract("Flipper")?, &())?)
    }

    pub fn context() -> Result<Context, Box<dyn std::error::Error>> {
        let mut sandbox = sandbox();
        let owner = owner(&sandbox);
        let another = another(&sandbox);
        let flipper = flipper(&mut sandbox, &Project::default(), &owner)?;
        Ok(Context {
            sandbox,
            owner,
            another,
            flipper,
        })
    }
}
