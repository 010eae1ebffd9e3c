mod transaction_dto;

pub use transaction_dto::{
    ChargeDto, CreateTransactionDto, DiscardDto, MailingDto, MailingQuery,
    TransactionResponseDto, UpdateTransactionDto, UserBalanceDto,
};
