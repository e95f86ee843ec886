//! Definitions of Solidity functions called while wiring the marketplace together

use alloy_sol_types::sol;

sol! {
    interface IMarketFactory {
        function initialize(address owner) external;
        function setMarketplace(address marketplace) external;
    }

    interface IRedeemAndFee {
        function setFlatFee(uint256 fee) external;
        function setMarketPlace(address marketplace) external;
    }

    interface IMain {
        function setMarketFactory(address factory) external;
        function setRedeemFeeContract(address redeemFee) external;
    }

    interface IServiceMarket {
        function setRedeemFeeContract(address redeemFee) external;
    }

    interface IGift {
        function setMarketPlace(address marketplace) external;
    }
}
