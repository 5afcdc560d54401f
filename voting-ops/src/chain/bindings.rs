use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IAnonymousSportsVoting {
        function addCandidate(string name, string category) external;
        function createVotingEvent(string name, string description, uint256[] candidateIds) external;
        function authorizeVoter(address voter) external;
        function castVote(uint256 eventId, uint256 candidateId) external;

        function admin() external view returns (address);
        function currentEventId() external view returns (uint256);
        function nextCandidateId() external view returns (uint256);
        function authorizedVoters(address voter) external view returns (bool);

        function getEventInfo(uint256 eventId) external view returns (
            string name,
            string description,
            uint256 startTime,
            uint256 endTime,
            uint256 revealStartTime,
            uint256 revealEndTime,
            bool isActive,
            bool resultsRevealed,
            uint256[] candidateIds,
            uint256 totalVotes,
            uint256 winnerId
        );
        function getCandidateInfo(uint256 candidateId) external view returns (
            string name,
            string category,
            bool isActive
        );
        function isVotingActive(uint256 eventId) external view returns (bool);
        function isRevealPeriodActive(uint256 eventId) external view returns (bool);
        function getVoterStatus(uint256 eventId, address voter) external view returns (
            bool hasVoted,
            uint256 voteTimestamp
        );
    }
}
